//! # 工具模块集合
//!
//! 提供页面和组件共用的工具函数和辅助模块，包括错误处理、帮助信息、
//! 键盘事件处理和日志记录。
//!
//! ## 模块组织
//!
//! ```text
//! utils/
//! ├── errors.rs     - 错误处理、Panic Hook 与 trace_dbg! 宏
//! ├── help_msg.rs   - 底部帮助信息 ("描述: 按键")
//! ├── key_events.rs - 可比较的按键封装与按键名称
//! ├── logging.rs    - 写入数据目录的日志配置
//! └── mod.rs        - 模块导出声明
//! ```
//!
//! ## 功能模块说明
//!
//! ### 错误处理 (`errors`)
//! - Color-eyre 错误报告
//! - Panic Hook 设置与终端恢复
//! - 调试和发布构建的不同处理策略
//!
//! ### 帮助系统 (`help_msg`)
//! - 快捷键说明格式化，如 `Move focus: j/k | Submit: s`
//! - 表单帮助与当前输入框帮助的组合
//! - 帮助栏渲染
//!
//! ### 键盘事件 (`key_events`)
//! - 只比较按键码与修饰键的 `KeyEvent` 封装
//! - 按键的字符串表示，如 `enter`、`ctrl-z`
//!
//! ### 日志记录 (`logging`)
//! - 日志文件位于 `<data_dir>/watermark_form.log`
//! - 级别取自 `RUST_LOG` 或 `WATERMARK_FORM_LOGLEVEL`，默认 `info`
//!
//! ## 编译条件
//!
//! - `#[cfg(not(tarpaulin_include))]`: `errors` 与 `logging` 修改进程全局状态，
//!   在代码覆盖率测试时排除
//!
//! ## 使用示例
//!
//! ```rust
//! use crate::utils::help_msg::{HelpEntry, HelpMsg};
//!
//! let help = HelpMsg::from(vec![
//!     HelpEntry::new_plain("j/k", "Move focus"),
//!     HelpEntry::new('s', "Submit"),
//! ]);
//! ```

#[cfg(not(tarpaulin_include))]
pub(crate) mod errors;
pub(crate) mod help_msg;
pub(crate) mod key_events;
#[cfg(not(tarpaulin_include))]
pub(crate) mod logging;
