use clap::Parser;
use plist_atlas::utils::error::{AtlasError, ErrorSeverity};
use plist_atlas::utils::{logger, validation::Validate};
use plist_atlas::{AtlasPipeline, CliConfig, ConversionEngine, LocalStorage};

fn exit_code(e: &AtlasError) -> i32 {
    match e.severity() {
        ErrorSeverity::Medium => 2,   // 內容錯誤
        ErrorSeverity::High => 1,     // 輸入、解析或設定錯誤
        ErrorSeverity::Critical => 3, // 寫檔失敗
    }
}

fn report_failure(stage: &str, e: &AtlasError) -> ! {
    tracing::error!(
        "❌ {} failed: {} (Category: {:?}, Severity: {:?})",
        stage,
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(exit_code(e));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting plist-atlas");
    tracing::debug!("CLI config: {:?}", cli);

    // 解析並驗證配置
    let config = match cli.resolve().and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => report_failure("Configuration", &e),
    };

    let pipeline = AtlasPipeline::new(LocalStorage::default(), config);
    let engine = ConversionEngine::new(pipeline);

    match engine.run().await {
        Ok(report) => {
            println!("🎉 Conversion complete!");
            println!("- Frames: {}", report.frames);
            if !report.skipped.is_empty() {
                println!("- Skipped: {}", report.skipped.len());
            }
            for output in &report.outputs {
                println!("📁 {}", output);
            }
        }
        Err(e) => report_failure("Conversion", &e),
    }

    Ok(())
}
