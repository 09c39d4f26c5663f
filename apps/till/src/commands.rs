//! # Till Commands
//!
//! The line-oriented front end: one command per input line.
//!
//! ## Command Flow
//! ```text
//! stdin line ──► Command::from_str ──► Till::execute ──► Reply ──► stdout
//!                      │                     │
//!                      └──── AppError ◄──────┘  printed as "Error: ...",
//!                                               the loop keeps going
//! ```
//!
//! ## Commands
//! | Command                        | Session operation              |
//! |--------------------------------|--------------------------------|
//! | `add <name...> <qty> <price>`  | `BillSession::add`             |
//! | `show`                         | open bill + totals preview     |
//! | `rate [<percent>]`             | show / change the session rate |
//! | `bill`, `finalize`             | `BillSession::finalize`        |
//! | `reset`                        | `BillSession::reset`           |
//! | `history [--json]`             | `BillSession::list_all`        |
//! | `items <id>`                   | stored line items of one bill  |
//! | `help`, `quit`                 |                                |

use std::fmt::Write as _;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};
use tracing::{debug, info};

use tally_core::validation::parse_tax_rate;
use tally_core::{BillTotals, FinalizedBill, Money, TaxRate};

use crate::error::{AppError, ErrorCode};
use crate::state::{BillSession, ConfigState};

const HELP: &str = "\
Commands:
  add <name> <qty> <price>   add a line item (name may contain spaces)
  show                       show the open bill
  rate [<percent>]           show or set the tax rate
  bill | finalize            close and save the open bill
  reset                      discard the open bill
  history [--json]           list saved bills, newest first
  items <id>                 show the items of a saved bill
  help                       this message
  quit | exit                leave (an open bill is discarded)";

// =============================================================================
// Parsing
// =============================================================================

/// A parsed input line.
///
/// Item fields stay as typed; validation happens in the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add {
        name: String,
        quantity: String,
        unit_price: String,
    },
    Show,
    Rate(Option<String>),
    Finalize,
    Reset,
    History { json: bool },
    Items(String),
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = AppError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut tokens = line.split_whitespace();
        let verb = tokens
            .next()
            .ok_or_else(|| AppError::invalid_command("Empty command"))?;
        let args: Vec<&str> = tokens.collect();

        let command = match (verb.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("add", _) => parse_add(&line.trim_start()[verb.len()..])?,
            ("show", []) => Command::Show,
            ("rate", []) => Command::Rate(None),
            ("rate", [rate]) => Command::Rate(Some(rate.to_string())),
            ("bill" | "finalize", []) => Command::Finalize,
            ("reset", []) => Command::Reset,
            ("history", []) => Command::History { json: false },
            ("history", ["--json"]) => Command::History { json: true },
            ("items", [id]) => Command::Items(id.to_string()),
            ("help" | "?", _) => Command::Help,
            ("quit" | "exit", []) => Command::Quit,
            (
                verb @ ("show" | "rate" | "bill" | "finalize" | "reset" | "history" | "items"
                | "quit" | "exit"),
                _,
            ) => {
                return Err(AppError::invalid_command(format!(
                    "Wrong arguments for '{verb}'; type 'help'"
                )))
            }
            (other, _) => {
                return Err(AppError::invalid_command(format!(
                    "Unknown command '{other}'; type 'help'"
                )))
            }
        };

        Ok(command)
    }
}

/// The last two tokens are quantity and price; the text before them is the
/// name, inner spacing kept as typed. With exactly two tokens the name is empty
/// and the session reports it.
fn parse_add(args: &str) -> Result<Command, AppError> {
    let usage = || AppError::invalid_command("Usage: add <name> <quantity> <price>");

    let (head, unit_price) = args
        .trim()
        .rsplit_once(char::is_whitespace)
        .ok_or_else(usage)?;
    let head = head.trim_end();
    let (name, quantity) = match head.rsplit_once(char::is_whitespace) {
        Some((name, quantity)) => (name.trim(), quantity),
        None => ("", head),
    };

    Ok(Command::Add {
        name: name.to_string(),
        quantity: quantity.to_string(),
        unit_price: unit_price.to_string(),
    })
}

// =============================================================================
// Till
// =============================================================================

/// Result of executing one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Quit,
}

/// The front end: a session, its configuration and the current tax rate.
#[derive(Debug)]
pub struct Till {
    session: BillSession,
    config: ConfigState,
    tax_rate: TaxRate,
}

impl Till {
    pub fn new(session: BillSession, config: ConfigState) -> Self {
        let tax_rate = config.default_tax_rate;
        Till {
            session,
            config,
            tax_rate,
        }
    }

    pub fn session(&self) -> &BillSession {
        &self.session
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    /// Reads commands until `quit` or end of input.
    ///
    /// Command errors are written to `out` and the loop continues; only I/O
    /// errors end it early.
    pub async fn run<R: BufRead, W: Write>(&mut self, input: R, mut out: W) -> io::Result<()> {
        writeln!(
            out,
            "{} | tax {} | type 'help' for commands",
            self.config.store_name, self.tax_rate
        )?;

        let mut lines = input.lines();
        loop {
            write!(out, "> ")?;
            out.flush()?;

            let Some(line) = lines.next() else {
                writeln!(out)?;
                break;
            };
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let reply = match line.parse::<Command>() {
                Ok(command) => self.execute(command).await,
                Err(e) => Err(e),
            };

            match reply {
                Ok(Reply::Text(text)) => writeln!(out, "{text}")?,
                Ok(Reply::Quit) => break,
                Err(e) => {
                    debug!(code = ?e.code, "Command failed");
                    writeln!(out, "Error: {}", e.message)?;
                }
            }
        }

        let open_items = self.session.bill().item_count();
        if open_items > 0 {
            info!(items = open_items, "Open bill discarded on exit");
            writeln!(out, "Open bill with {open_items} item(s) discarded")?;
        }

        Ok(())
    }

    /// Executes one command against the session.
    pub async fn execute(&mut self, command: Command) -> Result<Reply, AppError> {
        let text = match command {
            Command::Add {
                name,
                quantity,
                unit_price,
            } => {
                let item = self.session.add(&name, &quantity, &unit_price)?;
                format!(
                    "Added {} x{} @ {} = {} | subtotal {}",
                    item.name(),
                    item.quantity(),
                    self.money(item.unit_price()),
                    self.money(item.line_total()),
                    self.money(self.session.bill().subtotal()),
                )
            }
            Command::Show => self.render_open_bill()?,
            Command::Rate(None) => format!("Tax rate: {}", self.tax_rate),
            Command::Rate(Some(input)) => {
                self.tax_rate = parse_tax_rate(&input)?;
                format!("Tax rate set to {}", self.tax_rate)
            }
            Command::Finalize => {
                let bill = self.session.finalize(self.tax_rate).await?;
                format!("Bill #{} saved\n{}", bill.id, self.render_totals(&bill.totals()))
            }
            Command::Reset => {
                self.session.reset();
                "Bill cleared".to_string()
            }
            Command::History { json } => {
                let bills = self.session.list_all().await?;
                if json {
                    serde_json::to_string_pretty(&bills)
                        .map_err(|e| AppError::new(ErrorCode::Internal, e.to_string()))?
                } else {
                    self.render_history(&bills)
                }
            }
            Command::Items(id) => {
                let id: i64 = id
                    .parse()
                    .map_err(|_| AppError::invalid_command(format!("Bill id must be a number, got '{id}'")))?;
                self.render_stored_bill(id).await?
            }
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(Reply::Quit),
        };

        Ok(Reply::Text(text))
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    fn money(&self, amount: Money) -> String {
        self.config.format_currency(amount)
    }

    fn render_open_bill(&self) -> Result<String, AppError> {
        let bill = self.session.bill();
        if bill.is_empty() {
            return Ok("Bill is empty".to_string());
        }

        let totals = bill.preview(self.tax_rate).ok_or_else(|| {
            AppError::new(
                ErrorCode::InvalidQuantityOrPrice,
                "Bill total is too large; split it into smaller bills",
            )
        })?;

        let rows = bill
            .items()
            .iter()
            .map(|item| (item.name(), item.quantity(), item.unit_price(), item.line_total()));

        Ok(format!("{}\n{}", self.items_table(rows), self.render_totals(&totals)))
    }

    async fn render_stored_bill(&self, id: i64) -> Result<String, AppError> {
        let bill = self
            .session
            .get_bill(id)
            .await?
            .ok_or_else(|| AppError::not_found("Bill", id))?;
        let items = self.session.items_for(id).await?;

        let rows = items
            .iter()
            .map(|item| (item.name.as_str(), item.quantity, item.unit_price, item.line_total));

        Ok(format!(
            "Bill #{} ({})\n{}\n{}",
            bill.id,
            format_timestamp(&bill),
            self.items_table(rows),
            self.render_totals(&bill.totals())
        ))
    }

    fn items_table<'a>(&self, rows: impl Iterator<Item = (&'a str, i64, Money, Money)>) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Item Name", "Qty", "Price", "Total"]);
        for (name, quantity, unit_price, line_total) in rows {
            builder.push_record([
                name.to_string(),
                quantity.to_string(),
                self.money(unit_price),
                self.money(line_total),
            ]);
        }

        let mut table = builder.build();
        table.with(Style::modern());
        table.modify(Columns::new(1..), Alignment::right());
        table.to_string()
    }

    fn render_totals(&self, totals: &BillTotals) -> String {
        let tax_label = format!("Tax ({}):", totals.tax_rate);
        let width = tax_label.len().max("Subtotal:".len());

        let mut text = String::new();
        // writing to a String cannot fail
        let _ = writeln!(text, "{:<width$} {}", "Subtotal:", self.money(totals.subtotal));
        let _ = writeln!(text, "{:<width$} {}", tax_label, self.money(totals.tax));
        let _ = write!(text, "{:<width$} {}", "Total:", self.money(totals.total));
        text
    }

    fn render_history(&self, bills: &[FinalizedBill]) -> String {
        if bills.is_empty() {
            return "No bills yet".to_string();
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Date", "Items", "Total"]);
        for bill in bills {
            builder.push_record([
                bill.id.to_string(),
                format_timestamp(bill),
                bill.items_summary.clone(),
                self.money(bill.total),
            ]);
        }

        let mut table = builder.build();
        table.with(Style::modern());
        table.modify(Columns::single(3), Alignment::right());
        table.to_string()
    }
}

fn format_timestamp(bill: &FinalizedBill) -> String {
    bill.created_at
        .with_timezone(&chrono::Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}
