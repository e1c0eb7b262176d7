//! # 错误处理和 Panic 配置模块
//!
//! 提供全局错误处理机制，配置 panic hook 和错误报告系统。
//! 确保在发生错误时能够先恢复终端状态，再输出有用的错误信息。
//!
//! ## 核心功能
//!
//! - **Color-eyre 集成**: 彩色错误报告，`main` 中用 `.context(...)` 补充上下文
//! - **Panic Hook 配置**: 崩溃时先调用 [`crate::tui::restore`] 离开原始模式
//! - **错误记录**: 报告去除 ANSI 转义后写入日志文件
//! - **环境感知**: 调试和发布构建使用不同的报告方式
//!
//! ## 错误处理流程
//!
//! ```text
//! 程序运行
//!     │
//!     ├─ 正常执行 ─────────────────────────→ 程序结束
//!     │
//!     └─ 发生 Panic
//!         │
//!         ├─ 1. 执行 Panic Hook
//!         │   ├─ 恢复终端状态
//!         │   ├─ 生成错误报告
//!         │   └─ 记录日志
//!         │
//!         ├─ 2. 根据构建类型选择处理方式
//!         │   ├─ Debug: better-panic 完整堆栈
//!         │   └─ Release: human-panic 崩溃转储
//!         │
//!         └─ 3. 以 EXIT_FAILURE 退出
//! ```
//!
//! ## 水印绑定错误
//!
//! 绑定失败 ([`crate::watermark::WatermarkError`]) 不会 panic：
//! 它在 `FormPage::new` 中返回，由 `main` 附加上下文后作为普通错误报告。
//!
//! ## trace_dbg! 宏
//!
//! 类似 `std::dbg!`，但输出到 tracing 日志而非 stdout，不会破坏终端界面。
//!
//! ```rust
//! use crate::trace_dbg;
//!
//! // 基本用法
//! let value = trace_dbg!(42);
//!
//! // 指定日志级别
//! let dir = trace_dbg!(level: tracing::Level::INFO, &config.config.data_dir);
//! ```
//!
//! ## 依赖集成
//!
//! - **color-eyre**: 彩色错误报告和上下文信息
//! - **human-panic**: 发布构建的用户友好错误处理
//! - **better-panic**: 调试构建的详细错误信息
//! - **tracing**: 结构化日志记录
//! - **strip-ansi-escapes**: 清理 ANSI 转义字符

use std::env;

use color_eyre::Result;
use tracing::error;

pub fn init() -> Result<()> {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .panic_section(format!(
            "This is a bug. Consider reporting it at {}",
            env!("CARGO_PKG_REPOSITORY")
        ))
        .capture_span_trace_by_default(false)
        .display_location_section(false)
        .display_env_section(false)
        .into_hooks();
    eyre_hook.install()?;
    std::panic::set_hook(Box::new(move |panic_info| {
        if let Err(r) = crate::tui::restore() {
            error!("Unable to restore terminal: {:?}", r);
        }

        #[cfg(not(debug_assertions))]
        {
            use human_panic::{handle_dump, metadata, print_msg};
            let metadata = metadata!();
            let file_path = handle_dump(&metadata, panic_info);
            if print_msg(file_path, &metadata).is_err() {
                eprintln!("{} crashed", env!("CARGO_PKG_NAME"));
            }
            eprintln!("{}", panic_hook.panic_report(panic_info));
        }
        let msg = format!("{}", panic_hook.panic_report(panic_info));
        error!("Error: {}", strip_ansi_escapes::strip_str(msg));

        #[cfg(debug_assertions)]
        {
            better_panic::Settings::auto()
                .most_recent_first(false)
                .lineno_suffix(true)
                .verbosity(better_panic::Verbosity::Full)
                .create_panic_handler()(panic_info);
        }

        std::process::exit(libc::EXIT_FAILURE);
    }));
    Ok(())
}

/// Similar to the `std::dbg!` macro, but generates `tracing` events rather
/// than printing to stdout.
///
/// By default, the verbosity level for the generated events is `DEBUG`, but
/// this can be customized.
#[macro_export]
macro_rules! trace_dbg {
    (target: $target:expr, level: $level:expr, $ex:expr) => {{
        match $ex {
            value => {
                tracing::event!(target: $target, $level, ?value, stringify!($ex));
                value
            }
        }
    }};
    (level: $level:expr, $ex:expr) => {
        trace_dbg!(target: module_path!(), level: $level, $ex)
    };
    (target: $target:expr, $ex:expr) => {
        trace_dbg!(target: $target, level: tracing::Level::DEBUG, $ex)
    };
    ($ex:expr) => {
        trace_dbg!(level: tracing::Level::DEBUG, $ex)
    };
}
