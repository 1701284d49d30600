mod sleeper;
mod system_clock;

pub use sleeper::TokioSleeper;
pub use system_clock::SystemClock;
