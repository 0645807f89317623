use anyhow::{Context, Result};
use console::{style, Emoji};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::{
    cli::terminal::{Terminal, TerminalError},
    models::payment::{PaymentMethod, PurchaseSummary, Settlement},
    services::{
        catalog::Catalog,
        session::{CartSession, ProductChoice, SelectionError, SessionState},
    },
    utils::{
        formatting::{
            format_amount, format_catalog_table, format_decimal_amount, format_heading,
            format_summary_table,
        },
        Config,
    },
};

static CHECKMARK: Emoji<'_, '_> = Emoji("✅ ", "");
static CROSS: Emoji<'_, '_> = Emoji("❌ ", "");
static WARNING: Emoji<'_, '_> = Emoji("⚠️ ", "");
static CART: Emoji<'_, '_> = Emoji("🛒 ", "");

pub const FAREWELL: &str = "Thank you for visiting.";

/// Consecutive failed reads tolerated at one point of a session before giving up on the terminal.
const MAX_READ_FAILURES: u32 = 3;

/// Drives customer sessions against one catalog until the operator leaves.
pub struct StorefrontApp<T: Terminal> {
    terminal: T,
    catalog: Catalog,
    currency: String,
}

impl<T: Terminal> StorefrontApp<T> {
    pub fn new(terminal: T, catalog: Catalog, config: &Config) -> Self {
        Self {
            terminal,
            catalog,
            currency: config.currency.clone(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    /// Runs sessions back to back. Returns once the operator interrupts or input closes;
    /// any cart in progress at that point is dropped, stock already taken stays taken.
    pub fn run(&mut self, shutdown: &CancellationToken) -> Result<()> {
        if self.catalog.is_empty() {
            warn!("Storefront opened with an empty catalog");
        } else {
            info!("Storefront open with {} products", self.catalog.len());
        }

        loop {
            if shutdown.is_cancelled() {
                info!("Shutdown requested, leaving the storefront");
                break;
            }

            match self.run_session(shutdown) {
                Ok(()) => {}
                Err(e) if e.is_termination() => {
                    info!("Operator ended the storefront: {}", e);
                    break;
                }
                Err(e) => {
                    error!("Terminal failure: {}", e);
                    return Err(e).context("Storefront stopped on a terminal error");
                }
            }
        }

        self.terminal.write_line("");
        self.terminal.write_line(FAREWELL);
        Ok(())
    }

    fn run_session(&mut self, shutdown: &CancellationToken) -> Result<(), TerminalError> {
        let customer = self.read_required_input("To begin, please enter your name")?;
        let mut session = CartSession::new(customer);

        self.select_products(&mut session, shutdown)?;
        self.finish_session(&mut session)?;

        self.terminal
            .write_line("Thank you for your purchase. Returning to catalog...");
        self.terminal.write_line("");
        Ok(())
    }

    fn select_products(
        &mut self,
        session: &mut CartSession,
        shutdown: &CancellationToken,
    ) -> Result<(), TerminalError> {
        let mut failures = 0;

        while session.state() == SessionState::Selecting {
            if shutdown.is_cancelled() {
                return Err(TerminalError::Interrupted);
            }

            self.show_catalog();

            let Some(raw_id) = self.read_input(
                "Please enter the ID of the product you want to buy (enter 0 to finish)",
                &mut failures,
            )?
            else {
                continue;
            };

            let (product_id, name) = match session.choose_product(&self.catalog, &raw_id) {
                Ok(ProductChoice::Finish) => break,
                Ok(ProductChoice::Product { id, name }) => (id, name),
                Err(e) => {
                    self.report(&e);
                    continue;
                }
            };

            let Some(raw_quantity) = self.read_input(
                &format!("Please enter the quantity of {} you want to buy", name),
                &mut failures,
            )?
            else {
                continue;
            };

            match session.add_to_cart(&mut self.catalog, product_id, &raw_quantity) {
                Ok(line) => {
                    self.terminal.write_line(&format!(
                        "{}{} in cart: {} units, {}",
                        CHECKMARK,
                        style(&line.product_name).green(),
                        line.quantity,
                        format_amount(line.subtotal, &self.currency)
                    ));
                }
                Err(e) => {
                    self.report(&e);
                    continue;
                }
            }

            let answer = self.read_required_input("Do you want to keep shopping? (y/n)")?;
            if let Err(e) = session.confirm_continue(&answer) {
                self.report(&e);
            }
        }

        Ok(())
    }

    fn finish_session(&mut self, session: &mut CartSession) -> Result<(), TerminalError> {
        let Some(summary) = session.summary() else {
            debug!("Session {} bought nothing, skipping summary", session.id());
            if let Err(e) = session.close() {
                self.report(&e);
            }
            return Ok(());
        };

        self.show_summary(&summary);

        let code = self.read_required_input(&format!(
            "Select payment method ({}: Debit, {}: Credit)",
            PaymentMethod::DEBIT_CODE,
            PaymentMethod::CREDIT_CODE
        ))?;

        match session.settle(&code) {
            Ok(settlement) => {
                self.show_settlement(&settlement);
                log_receipt(&summary, &settlement);
            }
            Err(e) => self.report(&e),
        }

        Ok(())
    }

    fn show_catalog(&mut self) {
        let table = format_catalog_table(self.catalog.products());
        self.terminal.write_line(&table);
        self.terminal.write_line("");
    }

    fn show_summary(&mut self, summary: &PurchaseSummary) {
        self.terminal.write_line(&"_".repeat(20));
        self.terminal.write_line("");
        self.terminal
            .write_line(&format!("{}{}", CART, format_heading("Purchase summary:")));
        self.terminal.write_line("");
        self.terminal
            .write_line(&format!("Customer: {}", summary.customer));
        self.terminal
            .write_line(&format_summary_table(&summary.lines));
        self.terminal.write_line(&format!(
            "Total products purchased: {}",
            summary.total_quantity
        ));
        self.terminal.write_line(&format!(
            "Total amount: {}",
            format_amount(summary.total_amount, &self.currency)
        ));
    }

    fn show_settlement(&mut self, settlement: &Settlement) {
        if settlement.is_discounted() {
            self.terminal.write_line(&format!(
                "Final amount with discount (3% for credit payment): {}",
                format_decimal_amount(settlement.final_amount, &self.currency)
            ));
        } else {
            self.terminal
                .write_line("No discount applies to debit payment.");
        }
    }

    /// Reads one answer. Read failures other than termination are reported and yield `None`
    /// so the caller can re-prompt, up to `MAX_READ_FAILURES` in a row.
    fn read_input(
        &mut self,
        prompt: &str,
        failures: &mut u32,
    ) -> Result<Option<String>, TerminalError> {
        match self.terminal.read_line(prompt) {
            Ok(line) => {
                *failures = 0;
                Ok(Some(line))
            }
            Err(e) if e.is_termination() => Err(e),
            Err(e) => {
                *failures += 1;
                self.report(&SelectionError::Unexpected(e.to_string()));
                if *failures >= MAX_READ_FAILURES {
                    Err(e)
                } else {
                    Ok(None)
                }
            }
        }
    }

    /// Asks the same prompt again after each absorbed read failure.
    fn read_required_input(&mut self, prompt: &str) -> Result<String, TerminalError> {
        let mut failures = 0;
        loop {
            if let Some(line) = self.read_input(prompt, &mut failures)? {
                return Ok(line);
            }
        }
    }

    fn report(&mut self, err: &SelectionError) {
        match err {
            SelectionError::InputFormat { .. } => {
                warn!("Rejected input: {}", err);
                self.terminal
                    .write_line(&format!("{}{}", CROSS, style(err).red()));
            }
            SelectionError::Validation(_) => {
                warn!("Rejected selection: {}", err);
                self.terminal
                    .write_line(&format!("{}{}", CROSS, style(err).red()));
            }
            SelectionError::OutOfOrder { .. } | SelectionError::Unexpected(_) => {
                error!("{}", err);
                self.terminal
                    .write_line(&format!("{}{}", WARNING, style(err).yellow()));
            }
        }
    }
}

fn log_receipt(summary: &PurchaseSummary, settlement: &Settlement) {
    let receipt = serde_json::json!({
        "summary": summary,
        "settlement": settlement,
    });
    info!(receipt = %receipt, "Session {} completed", summary.session_id);
}
