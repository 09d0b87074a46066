pub mod logging;
pub use logging::{FileLogger, StdoutLogger, init_file_logger, init_stdout_logger};

mod tensor;
pub use tensor::*;

pub use log;
