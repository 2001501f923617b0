//! 平台识别与安装策略表
//!
//! 安装逻辑统一为一张静态查表：OS 家族 + 包管理器探测 → 安装命令序列。

use std::env;

/// 操作系统家族
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OsFamily {
    Linux,
    MacOs,
    Windows,
}

impl OsFamily {
    /// 识别当前操作系统
    pub fn current() -> Option<Self> {
        match env::consts::OS {
            "linux" => Some(OsFamily::Linux),
            "macos" => Some(OsFamily::MacOs),
            "windows" => Some(OsFamily::Windows),
            _ => None,
        }
    }

    /// 转换为字符串
    pub fn as_str(&self) -> &'static str {
        match self {
            OsFamily::Linux => "linux",
            OsFamily::MacOs => "macos",
            OsFamily::Windows => "windows",
        }
    }

    /// nativefier 的 --platform 取值
    pub fn nativefier_platform(&self) -> &'static str {
        match self {
            OsFamily::Linux => "linux",
            OsFamily::MacOs => "mac",
            OsFamily::Windows => "windows",
        }
    }
}

/// 安装策略：一个包管理器对应一串幂等安装命令
#[derive(Debug)]
pub struct InstallStrategy {
    /// 适用的 OS 家族
    pub os: OsFamily,
    /// 用于探测的包管理器二进制名
    pub package_manager: &'static str,
    /// 按顺序执行的安装命令
    pub commands: &'static [&'static [&'static str]],
}

/// 历史上三版脚本各自实现过的安装分支，收敛成一张表
pub const INSTALL_STRATEGIES: &[InstallStrategy] = &[
    InstallStrategy {
        os: OsFamily::Linux,
        package_manager: "apt-get",
        commands: &[
            &["apt-get", "update"],
            &[
                "apt-get",
                "install",
                "-y",
                "docker.io",
                "docker-compose-plugin",
            ],
        ],
    },
    InstallStrategy {
        os: OsFamily::Linux,
        package_manager: "dnf",
        commands: &[&["dnf", "install", "-y", "docker", "docker-compose-plugin"]],
    },
    InstallStrategy {
        os: OsFamily::MacOs,
        package_manager: "brew",
        commands: &[&["brew", "install", "--cask", "docker"]],
    },
];

/// 按 OS 家族和可用的包管理器选出安装策略
pub fn select_strategy<F>(os: OsFamily, available: F) -> Option<&'static InstallStrategy>
where
    F: Fn(&str) -> bool,
{
    INSTALL_STRATEGIES
        .iter()
        .find(|s| s.os == os && available(s.package_manager))
}

/// 当前进程是否以 root 运行（仅 Unix 有意义）
pub fn is_root() -> bool {
    cfg!(unix)
        && env::var("USER")
            .map(|u| u == "root")
            .unwrap_or(false)
}

/// 需要特权的命令按平台加 sudo 前缀
///
/// brew 明确禁止在 root 下运行，macOS 的命令不做提升。
pub fn elevate<'a>(os: OsFamily, root: bool, cmd: &[&'a str]) -> (&'a str, Vec<&'a str>) {
    if os == OsFamily::Linux && !root {
        ("sudo", cmd.to_vec())
    } else {
        (cmd[0], cmd[1..].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apt_branch_selected_when_apt_present() {
        let strategy = select_strategy(OsFamily::Linux, |pm| pm == "apt-get").unwrap();
        assert_eq!(strategy.package_manager, "apt-get");
        assert_eq!(strategy.commands.len(), 2);
        assert!(strategy.commands[1].contains(&"docker.io"));
    }

    #[test]
    fn test_dnf_branch_selected_when_apt_missing() {
        let strategy = select_strategy(OsFamily::Linux, |pm| pm == "dnf").unwrap();
        assert_eq!(strategy.package_manager, "dnf");
    }

    #[test]
    fn test_no_package_manager_found() {
        assert!(select_strategy(OsFamily::Linux, |_| false).is_none());
        // Windows 不在安装表里
        assert!(select_strategy(OsFamily::Windows, |_| true).is_none());
    }

    #[test]
    fn test_brew_on_macos() {
        let strategy = select_strategy(OsFamily::MacOs, |pm| pm == "brew").unwrap();
        assert_eq!(strategy.commands.len(), 1);
        assert_eq!(
            strategy.commands[0].to_vec(),
            vec!["brew", "install", "--cask", "docker"]
        );
    }

    #[test]
    fn test_elevate() {
        let (program, args) = elevate(OsFamily::Linux, false, &["systemctl", "start", "docker"]);
        assert_eq!(program, "sudo");
        assert_eq!(args, vec!["systemctl", "start", "docker"]);

        let (program, args) = elevate(OsFamily::Linux, true, &["systemctl", "start", "docker"]);
        assert_eq!(program, "systemctl");
        assert_eq!(args, vec!["start", "docker"]);

        // macOS 不加 sudo
        let (program, _) = elevate(OsFamily::MacOs, false, &["open", "-a", "Docker"]);
        assert_eq!(program, "open");
    }
}
