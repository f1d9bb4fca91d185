//! Live calculator session: inputs, stopwatch and the active job.

pub mod clock;
pub mod logger;
pub mod mode;
pub mod state;
pub mod stopwatch;

pub use clock::{Clock, ManualClock, SystemClock};
pub use logger::{default_job_name, PassLogger};
pub use mode::{InputField, JobPhase, UiEvent, UiMode};
pub use state::{ExtendedInputs, RawInputs, SessionState};
pub use stopwatch::{Stopwatch, MAX_ELAPSED_SECS};
