//! 内置管道行为
//!
//! - [`LoggingBehavior`]：为每次分发创建 `tracing` span，并记录耗时与失败；
//! - [`ValidationBehavior`]：在进入处理器之前按消息类型执行校验函数。
//!
mod logging;
mod validation;

pub use logging::LoggingBehavior;
pub use validation::ValidationBehavior;
