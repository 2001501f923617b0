//! ChatStack - 本地 LLM 聊天栈引导器
//!
//! Usage:
//! - Default run: `chatstack`
//! - Custom model: `chatstack --model mistral:7b`
//! - Docker already managed elsewhere: `chatstack --skip-docker-check`

use chatstack::config::{constants, StackConfig};

/// 参数解析结果
#[derive(Debug)]
enum Cli {
    Run(StackConfig),
    Help,
}

/// 解析命令行参数
///
/// 未知参数直接报错：这工具会动宿主机环境，拼错的 flag 不能静默吞掉。
fn parse_args(args: &[String]) -> Result<Cli, String> {
    let mut config = StackConfig::from_env();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-m" | "--model" => {
                if i + 1 >= args.len() {
                    return Err(format!("{} requires a value", args[i]));
                }
                config.model_tag = args[i + 1].clone();
                i += 2;
            }
            "--skip-docker-check" => {
                config.skip_environment_check = true;
                i += 1;
            }
            "--help" | "-h" => {
                return Ok(Cli::Help);
            }
            other => {
                return Err(format!("Unknown option: {}", other));
            }
        }
    }

    Ok(Cli::Run(config))
}

fn print_help() {
    println!("ChatStack {} - local LLM chat stack bootstrapper", constants::VERSION);
    println!();
    println!("Provisions Ollama + Open WebUI + Chroma via Docker Compose,");
    println!("waits for the UI, wraps it in a desktop app and prefetches a model.");
    println!();
    println!("USAGE:");
    println!("    chatstack [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -m, --model <TAG>      Model tag to prefetch (default: {})", constants::DEFAULT_MODEL_TAG);
    println!("    --skip-docker-check    Skip Docker detection/installation/start");
    println!("    -h, --help             Print help information");
    println!();
    println!("EXAMPLES:");
    println!("    chatstack                          # Full bootstrap with defaults");
    println!("    chatstack -m mistral:7b            # Prefetch a different model");
    println!("    chatstack --skip-docker-check      # Docker is already running");
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let config = match parse_args(&args) {
        Ok(Cli::Help) => {
            print_help();
            return;
        }
        Ok(Cli::Run(config)) => config,
        Err(message) => {
            eprintln!("error: {}", message);
            eprintln!();
            eprintln!("Run 'chatstack --help' for usage.");
            std::process::exit(2);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    if let Err(e) = rt.block_on(chatstack::run(config)) {
        tracing::error!(error = %e, "Bootstrap failed");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("chatstack".to_string())
            .chain(list.iter().map(|s| s.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_without_flags() {
        let cli = parse_args(&args(&[])).unwrap();
        match cli {
            Cli::Run(config) => {
                assert_eq!(config.model_tag, "llama3:8b");
                assert!(!config.skip_environment_check);
            }
            Cli::Help => panic!("expected run"),
        }
    }

    #[test]
    fn test_model_override() {
        for flag in ["-m", "--model"] {
            let cli = parse_args(&args(&[flag, "mistral:7b"])).unwrap();
            match cli {
                Cli::Run(config) => assert_eq!(config.model_tag, "mistral:7b"),
                Cli::Help => panic!("expected run"),
            }
        }
    }

    #[test]
    fn test_skip_docker_check() {
        let cli = parse_args(&args(&["--skip-docker-check"])).unwrap();
        match cli {
            Cli::Run(config) => assert!(config.skip_environment_check),
            Cli::Help => panic!("expected run"),
        }
    }

    #[test]
    fn test_unknown_flag_is_an_error() {
        let err = parse_args(&args(&["--bogus"])).unwrap_err();
        assert!(err.contains("--bogus"));
    }

    #[test]
    fn test_model_flag_without_value_is_an_error() {
        let err = parse_args(&args(&["--model"])).unwrap_err();
        assert!(err.contains("requires a value"));
    }

    #[test]
    fn test_help_flag() {
        assert!(matches!(parse_args(&args(&["-h"])).unwrap(), Cli::Help));
        assert!(matches!(parse_args(&args(&["--help"])).unwrap(), Cli::Help));
    }
}
