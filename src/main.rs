#[cfg(any(target_arch = "riscv32", target_arch = "xtensa"))]
mod app {
    use std::time::Instant;

    use esp_idf_svc::hal::delay::FreeRtos;
    use log::{error, info};

    use deep_sleep_manager::core::{AppConfig, DeepSleepController};
    use deep_sleep_manager::power::{
        BootTracker, EspIdfDeepSleep, EspIdfWakeupPin, WakeupSources,
    };

    /// ステータスLED (スリープ中は消灯のままHoldする)
    const STATUS_LED_PIN: i32 = 21;

    /// アプリケーションのメインエントリーポイント
    pub fn run() -> anyhow::Result<()> {
        // ESP-IDFの基本初期化
        esp_idf_svc::sys::link_patches();
        esp_idf_svc::log::EspLogger::initialize_default();

        // スリープ中に固定されていたピンを解放
        unsafe {
            esp_idf_sys::gpio_hold_dis(STATUS_LED_PIN);
        }

        // 設定ファイル読み込み
        let config = AppConfig::load().map_err(|e| {
            error!("設定の読み込みに失敗しました: {}", e);
            anyhow::anyhow!("設定エラー: {}", e)
        })?;

        // 起動診断と直近のウェイクアップ原因
        let wake_cause = BootTracker::record_boot();

        // ウェイクアップソースの構築
        let mut wakeup = WakeupSources::new();
        if let Some(pin_config) = &config.wakeup_pin {
            let pin = EspIdfWakeupPin::new(pin_config.pin);
            // 反転ピンはウェイクレベルもLowになる
            wakeup.set_wakeup_pin(Box::new(pin), !pin_config.inverted, pin_config.mode);
        }
        if let Some((mask, mode)) = config.wakeup_mask {
            wakeup.set_wakeup_mask(mask, mode);
        }
        wakeup.set_touch_wakeup(config.touch_wakeup);

        // コントローラーの構築
        let mut controller = DeepSleepController::new(
            EspIdfDeepSleep,
            wakeup,
            config.sleep_duration_us,
            config.run_duration,
        );

        // スリープ直前のフック登録
        controller.hooks_mut().on_shutdown(|| {
            // 無線を物理的に停止する (電力ドレインの最大の原因の一つ)
            unsafe {
                let _ = esp_idf_sys::esp_wifi_stop();
                let _ = esp_idf_sys::esp_wifi_deinit();
            }
        });
        controller.hooks_mut().on_powerdown(|| {
            // ステータスLEDを消灯・固定
            unsafe {
                esp_idf_sys::gpio_set_level(STATUS_LED_PIN, 1);
                esp_idf_sys::gpio_hold_en(STATUS_LED_PIN);
            }
        });

        // 時刻指定スリープはオートメーション経由の手動トリガーが使用する
        if let Some(until) = config.until {
            let timezone: chrono_tz::Tz = config.timezone.parse().unwrap_or(chrono_tz::Asia::Tokyo);
            info!(
                "時刻指定スリープ設定: {:02}:{:02}:{:02} ({})",
                until.hour, until.minute, until.second, timezone
            );
        }

        controller.setup(wake_cause, Instant::now());

        // 他コンポーネントはこのハンドルで Deep Sleep の有無を確認できる
        let _presence = controller.presence();

        info!("=== 協調ループを開始します ===");
        loop {
            controller.tick(Instant::now());
            FreeRtos::delay_ms(50);
        }
    }
}

fn main() -> anyhow::Result<()> {
    #[cfg(any(target_arch = "riscv32", target_arch = "xtensa"))]
    return app::run();

    #[cfg(not(any(target_arch = "riscv32", target_arch = "xtensa")))]
    {
        eprintln!("deep_sleep_manager は ESP-IDF ターゲット向けのファームウェアです");
        Ok(())
    }
}
