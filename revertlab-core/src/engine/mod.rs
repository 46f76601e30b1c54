//! Backtesting engine: the equity state machine and its drivers.
//!
//! The engine consumes a price series plus its precomputed signals and ratios,
//! then runs the four-phase bar transition:
//!
//! 1. Close the prior position at the new close
//! 2. Open a new position if the signal asks for one
//! 3. Record equity
//! 4. Move the reference price forward

pub mod benchmark;
pub mod run;
pub mod simulator;
pub mod state;
pub mod step;

pub use benchmark::{buy_and_hold, buy_and_hold_final};
pub use run::{run_instrument, InstrumentRun};
pub use simulator::{SimulationError, SimulationResult, Simulator};
pub use state::{PositionSide, PositionState};
pub use step::{step, StepOutcome};
