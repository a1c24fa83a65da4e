/// The Elm Architecture (TEA) pattern for the contact form
///
/// State lives in `Model`, changes only through `update`, and side effects
/// are described as `Command`s run by the `CommandExecutor`.

pub mod command;
pub mod message;
pub mod model;
pub mod update;

pub use command::{Command, CommandExecutor};
pub use message::{Message, SubmissionOutcome};
pub use model::{Model, MutationState};
pub use update::update;

/// Result of processing a TEA update cycle
#[derive(Debug)]
pub struct UpdateResult<M> {
    pub model: M,
    pub commands: Vec<Command>,
}

impl<M> UpdateResult<M> {
    pub fn new(model: M, commands: Vec<Command>) -> Self {
        Self { model, commands }
    }

    pub fn just_model(model: M) -> Self {
        Self {
            model,
            commands: Vec::new(),
        }
    }

    pub fn with_command(model: M, command: Command) -> Self {
        Self {
            model,
            commands: vec![command],
        }
    }
}
