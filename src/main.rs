use card_checkout::application::card_form::{CardEntry, CardField};
use card_checkout::application::flow::PaymentFlow;
use card_checkout::application::three_d_secure::ThreeDSecureRedirect;
use card_checkout::config::{
    CheckoutConfig, DEFAULT_AMOUNT_MINOR, DEFAULT_BASE_URL, DEFAULT_CURRENCY, DEFAULT_FAILURE_URL,
    DEFAULT_PUBLIC_KEY, DEFAULT_SUCCESS_URL,
};
use card_checkout::domain::formatting::{format_expiry, format_number};
use card_checkout::domain::payment::{GatewayStatus, PaymentStatus};
use card_checkout::domain::ports::{
    PaymentGateway, PaymentGatewayBox, TokenizationGateway, TokenizationGatewayBox,
};
use card_checkout::domain::validation::detect_scheme;
use card_checkout::infrastructure::checkout_api::CheckoutApi;
use card_checkout::infrastructure::in_memory::{InMemoryGateway, SIMULATED_CHALLENGE_URL};
use card_checkout::interfaces::csv::card_reader::CardReader;
use card_checkout::interfaces::csv::report_writer::{ValidationReport, ValidationReportWriter};
use chrono::Local;
use clap::{Args, Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result, miette};
use std::fs::File;
use std::io::{self, BufRead};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Detect the scheme of a card number and format it for display
    FormatNumber { input: String },
    /// Format an expiry date as MM/YYYY
    FormatExpiry { input: String },
    /// Validate a single set of card details
    Validate(CardArgs),
    /// Validate every `number,expiry,cvv` row of a CSV file
    ValidateBatch {
        /// Input CSV file
        input: PathBuf,
    },
    /// Tokenize a card and run one 3-D Secure payment
    Pay {
        #[command(flatten)]
        card: CardArgs,
        #[command(flatten)]
        gateway: GatewayArgs,
        /// Answer gateway calls from memory instead of calling the API
        #[arg(long, value_enum)]
        simulate: Option<Simulation>,
        /// Print the final payment state as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct CardArgs {
    #[arg(long)]
    number: String,
    /// Expiry as MM/YYYY (raw digits are accepted)
    #[arg(long)]
    expiry: String,
    #[arg(long)]
    cvv: String,
}

#[derive(Args)]
struct GatewayArgs {
    #[arg(long, env = "CHECKOUT_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,
    #[arg(long, env = "CHECKOUT_PUBLIC_KEY", default_value = DEFAULT_PUBLIC_KEY)]
    public_key: String,
    #[arg(long, env = "CHECKOUT_SECRET_KEY", default_value = "", hide_env_values = true)]
    secret_key: String,
    /// Amount in minor units
    #[arg(long, default_value_t = DEFAULT_AMOUNT_MINOR)]
    amount: i64,
    #[arg(long, default_value = DEFAULT_CURRENCY)]
    currency: String,
    #[arg(long, default_value = DEFAULT_SUCCESS_URL)]
    success_url: String,
    #[arg(long, default_value = DEFAULT_FAILURE_URL)]
    failure_url: String,
}

impl From<GatewayArgs> for CheckoutConfig {
    fn from(args: GatewayArgs) -> Self {
        Self {
            amount_minor: args.amount,
            currency: args.currency,
            public_key: args.public_key,
            secret_key: args.secret_key,
            base_url: args.base_url,
            success_url: args.success_url,
            failure_url: args.failure_url,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Simulation {
    /// The payment is pending and requires a 3-D Secure challenge
    Challenge,
    /// The payment is authorized without a challenge
    Authorized,
    /// The payment is declined
    Declined,
    /// Tokenization is rejected
    TokenizationError,
}

impl Simulation {
    fn gateway(self) -> InMemoryGateway {
        match self {
            Simulation::Challenge => InMemoryGateway::pending_challenge(SIMULATED_CHALLENGE_URL),
            Simulation::Authorized => InMemoryGateway::responding(GatewayStatus::Authorized, None),
            Simulation::Declined => InMemoryGateway::responding(GatewayStatus::Declined, None),
            Simulation::TokenizationError => {
                InMemoryGateway::failing_tokenization("Tokenization failed: card_number_invalid")
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::FormatNumber { input } => {
            let scheme = detect_scheme(&input);
            println!("{scheme}");
            println!("{}", format_number(&input, scheme));
            Ok(())
        }
        Command::FormatExpiry { input } => {
            println!("{}", format_expiry(&input));
            Ok(())
        }
        Command::Validate(card) => validate(card),
        Command::ValidateBatch { input } => validate_batch(input),
        Command::Pay {
            card,
            gateway,
            simulate,
            json,
        } => pay(card, gateway.into(), simulate, json).await,
    }
}

impl From<CardArgs> for CardEntry {
    fn from(args: CardArgs) -> Self {
        CardEntry::new(args.number, args.expiry, args.cvv)
    }
}

fn validate(card: CardArgs) -> Result<()> {
    let entry = CardEntry::from(card);
    let today = Local::now().date_naive();
    println!("scheme: {}", entry.scheme());

    let mut valid = true;
    for (label, field) in [
        ("number", CardField::Number),
        ("expiry", CardField::Expiry),
        ("cvv", CardField::Cvv),
    ] {
        if entry.value(field).is_empty() {
            valid = false;
            println!("{label}: missing");
        } else if entry.is_field_valid_at(field, today) {
            println!("{label}: ok");
        } else {
            valid = false;
            println!("{label}: {}", field.error_message());
        }
    }

    if valid {
        Ok(())
    } else {
        Err(miette!("card details are invalid"))
    }
}

fn validate_batch(input: PathBuf) -> Result<()> {
    let file = File::open(input).into_diagnostic()?;
    let reader = CardReader::new(file);
    let today = Local::now().date_naive();

    let mut reports = Vec::new();
    for record in reader.records() {
        match record {
            Ok(record) => reports.push(ValidationReport::evaluate(&record, today)),
            Err(e) => eprintln!("Error reading card record: {}", e),
        }
    }

    let stdout = io::stdout();
    let mut writer = ValidationReportWriter::new(stdout.lock());
    writer.write_reports(reports).into_diagnostic()?;
    Ok(())
}

fn boxed<G>(gateway: G) -> (TokenizationGatewayBox, PaymentGatewayBox)
where
    G: TokenizationGateway + PaymentGateway + Clone + 'static,
{
    (Box::new(gateway.clone()), Box::new(gateway))
}

async fn pay(
    card: CardArgs,
    config: CheckoutConfig,
    simulate: Option<Simulation>,
    json: bool,
) -> Result<()> {
    let card = CardEntry::from(card).card_details().into_diagnostic()?;
    config.validate_redirects().into_diagnostic()?;

    let (tokenizer, payments) = match simulate {
        Some(simulation) => boxed(simulation.gateway()),
        None => {
            config.validate().into_diagnostic()?;
            boxed(CheckoutApi::new(config.clone()).into_diagnostic()?)
        }
    };

    let mut flow = PaymentFlow::new(tokenizer, payments, ThreeDSecureRedirect::from_config(&config));
    println!("Paying {}", config.display_amount());
    flow.initiate(&card.number, &card.expiry_month, &card.expiry_year, &card.cvv)
        .await
        .into_diagnostic()?;

    if flow.state().status == PaymentStatus::Pending3ds {
        if let Some(url) = &flow.state().three_d_secure_url {
            println!("Complete 3-D Secure authentication at: {url}");
        }
        println!("Enter each URL the challenge navigates to (end of input cancels):");

        let mut resolved = false;
        for line in io::stdin().lock().lines() {
            let line = line.into_diagnostic()?;
            if flow.handle_navigation(line.trim()) {
                resolved = true;
                break;
            }
        }
        if !resolved {
            flow.cancel_challenge();
        }
    }

    let state = flow.state();
    if json {
        println!("{}", serde_json::to_string_pretty(state).into_diagnostic()?);
    }
    if let Some(outcome) = state.outcome() {
        println!("{}", outcome.title);
        println!("{}", outcome.message);
    }

    match (state.status, &state.error) {
        (PaymentStatus::Success, _) => Ok(()),
        (_, Some(error)) => Err(miette!("{error}")),
        (status, None) => Err(miette!("payment ended in state {status}")),
    }
}
