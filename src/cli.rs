use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::ClientConfig;
use crate::controller::{ContactFormController, FormSubmitEvent};
use crate::form::{FormErrors, FormField, SubmitStatus};

/// contact-form - Send contact messages to a GraphQL backend
#[derive(Parser)]
#[command(name = "contact-form")]
#[command(about = "Validate and submit contact form messages")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the backend base address
    #[arg(long, global = true)]
    pub base_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate the form and send it to the backend
    Submit(FormArgs),

    /// Validate the form without sending it
    Validate(FormArgs),

    /// Print the effective configuration
    Config,
}

#[derive(Args, Clone)]
pub struct FormArgs {
    /// Sender's full name
    #[arg(long, default_value = "")]
    pub full_name: String,

    /// Sender's email address
    #[arg(long, default_value = "")]
    pub email: String,

    /// Message body
    #[arg(long, default_value = "")]
    pub message: String,
}

impl FormArgs {
    fn fields(&self) -> [(FormField, &str); 3] {
        [
            (FormField::FullName, self.full_name.as_str()),
            (FormField::Email, self.email.as_str()),
            (FormField::Message, self.message.as_str()),
        ]
    }
}

/// Command-line interface handler
pub struct CliHandler {
    config: ClientConfig,
}

impl CliHandler {
    /// Create a new CLI handler, loading configuration from disk and environment
    pub async fn new(config_path: Option<PathBuf>, base_url: Option<String>) -> Result<Self> {
        let mut config = ClientConfig::load(config_path.as_deref()).await?;

        if let Some(base_url) = base_url {
            config.base_url = base_url;
            config.validate()?;
        }

        Ok(Self { config })
    }

    /// Handle CLI commands
    pub async fn handle_command(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Submit(args) => self.handle_submit(args).await,
            Commands::Validate(args) => self.handle_validate(args),
            Commands::Config => self.handle_config(),
        }
    }

    async fn handle_submit(&self, args: FormArgs) -> Result<()> {
        let mut controller = ContactFormController::from_config(&self.config)?;
        for (field, value) in args.fields() {
            controller.change(field, value);
        }

        let mut event = FormSubmitEvent::new();
        if !controller.submit(&mut event) {
            print_errors(controller.errors());
            return Err(anyhow!("Contact form is invalid"));
        }

        println!("📨 Sending message to {}...", self.config.base_url);
        controller.settle().await;

        let view = controller.view();
        match view.submit_status {
            SubmitStatus::Success => {
                println!("✅ {}", view.submit_message);
                Ok(())
            }
            _ => {
                eprintln!("❌ {}", view.submit_message);
                if let Some(attempts) = view.last_attempts {
                    eprintln!("   ({} attempt{})", attempts, if attempts == 1 { "" } else { "s" });
                }
                Err(anyhow!("Contact form submission failed"))
            }
        }
    }

    fn handle_validate(&self, args: FormArgs) -> Result<()> {
        let mut controller = ContactFormController::from_config(&self.config)?;
        for (field, value) in args.fields() {
            controller.change(field, value);
        }

        if controller.validate() {
            println!("✅ Contact form is valid");
            Ok(())
        } else {
            print_errors(controller.errors());
            Err(anyhow!("Contact form is invalid"))
        }
    }

    fn handle_config(&self) -> Result<()> {
        println!("{}", self.config.to_toml()?);
        Ok(())
    }
}

fn print_errors(errors: &FormErrors) {
    eprintln!("❌ Please fix the following:");
    for (field, message) in errors.iter() {
        eprintln!("   - {}: {}", field.label(), message);
    }
}
