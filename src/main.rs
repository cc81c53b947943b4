use clap::Parser;

use urlshortener::cli::{Cli, Commands};
use urlshortener::config::StaticConfig;
use urlshortener::errors::AppError;
use urlshortener::runtime::modes::run_server;
use urlshortener::system::init_logging;

#[actix_web::main]
async fn main() {
    let cli = Cli::parse();

    // 加载 .env（如果存在），需在读取配置前完成
    dotenvy::dotenv().ok();

    if matches!(cli.command, Some(Commands::ConfigGen)) {
        println!("{}", StaticConfig::generate_sample_config());
        return;
    }

    let mut config = match StaticConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            let err = AppError::validation(format!(
                "Failed to load {}: {}",
                cli.config.display(),
                e
            ));
            eprintln!("{}", err.format_colored());
            std::process::exit(1);
        }
    };

    // --secret / URLS_SECRET 优先于配置文件
    if let Some(secret) = cli.secret {
        config.auth.jwt_secret = secret;
    }

    // guard 必须持有到进程结束，否则文件日志会丢失
    let _log_guard = match init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {:#}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run_server(config).await {
        match e.downcast_ref::<AppError>() {
            Some(app_err) => eprintln!("{}", app_err.format_colored()),
            None => eprintln!("Server error: {:#}", e),
        }
        std::process::exit(1);
    }
}
