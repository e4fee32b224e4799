use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing::info;

use converter_widgets_lib::api::commands::converters::{
    get_currency_units_command, get_length_units_command, get_temperature_units_command,
    CurrencyWidget, LengthWidget, TemperatureWidget,
};
use converter_widgets_lib::api::commands::settings::get_settings_or_default;
use converter_widgets_lib::config::get_panel_config_for;
use converter_widgets_lib::shared::settings::AppSettings;
use converter_widgets_lib::shared::types::{ConverterFields, GetUnitsResponse};
use converter_widgets_lib::{
    init_tracing, AppResult, Category, CurrencyConverter, ExchangeRateProvider, LengthConverter,
    Navigator, TemperatureConverter,
};

#[derive(Parser)]
#[command(name = "converter-widgets", about = "Convert length, temperature and currency values")]
struct Cli {
    /// Settings file (defaults to the platform config directory)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a length, e.g. `length 1 mile km`
    Length(ConvertArgs),
    /// Convert a temperature, e.g. `temperature 100 celsius fahrenheit`
    Temperature(ConvertArgs),
    /// Convert an amount of money, e.g. `currency 10 USD EUR`
    Currency(ConvertArgs),
    /// Switch to a panel and show its initial conversion
    Panel { category: String },
    /// List the units available in a category
    Units { category: String },
}

#[derive(Args)]
struct ConvertArgs {
    value: String,
    from: String,
    to: String,
    /// Press swap before showing the result
    #[arg(long)]
    swap: bool,
    /// Current contents of the output field, used by --swap
    #[arg(long, default_value = "")]
    to_value: String,
}

impl ConvertArgs {
    fn fields<U>(&self, from: U, to: U) -> ConverterFields<U> {
        ConverterFields {
            from_value: self.value.clone(),
            to_value: self.to_value.clone(),
            from_unit: from,
            to_unit: to,
        }
    }
}

fn currency_converter(settings: &AppSettings) -> AppResult<CurrencyConverter> {
    let provider = ExchangeRateProvider::from_settings(settings)?;
    Ok(CurrencyConverter::new(Arc::new(provider)))
}

fn print_units(response: GetUnitsResponse) {
    for unit in response.units {
        println!("{}\t{}", unit.id, unit.label);
    }
}

fn print_fields<U: std::fmt::Display>(fields: &ConverterFields<U>) {
    println!("{} {} = {} {}", fields.from_value, fields.from_unit, fields.to_value, fields.to_unit);
}

async fn run(cli: Cli) -> AppResult<()> {
    let settings_path = cli.settings.as_deref();

    match cli.command {
        Command::Length(args) => {
            let fields = args.fields(args.from.parse()?, args.to.parse()?);
            let mut widget = LengthWidget::new(LengthConverter, fields);
            if args.swap {
                widget.swap();
            } else {
                widget.set_from_value(args.value.clone());
            }
            print_fields(widget.fields());
        }
        Command::Temperature(args) => {
            let fields = args.fields(args.from.parse()?, args.to.parse()?);
            let mut widget = TemperatureWidget::new(TemperatureConverter, fields);
            if args.swap {
                widget.swap();
            } else {
                widget.set_from_value(args.value.clone());
            }
            print_fields(widget.fields());
        }
        Command::Currency(args) => {
            let settings = get_settings_or_default(settings_path).await;
            let converter = currency_converter(&settings)?;
            if args.swap {
                let fields = converter.swap(args.fields(args.from.clone(), args.to.clone())).await;
                print_fields(&fields);
            } else {
                let mut output = String::new();
                converter.convert_into(&args.value, &args.from, &args.to, &mut output).await;
                println!("{} {} = {} {}", args.value, args.from, output, args.to);
            }
        }
        Command::Panel { category } => {
            let mut navigator = Navigator::default();
            let Some(active) = navigator.handle_nav(Some(&category)) else {
                println!("No panel named '{}'", category);
                return Ok(());
            };

            let settings = get_settings_or_default(settings_path).await;
            let panel = get_panel_config_for(active, &settings.preferences);
            info!(panel = %active, title = %panel.title, "panel selected");
            println!("{}", panel.title);

            match active {
                Category::Length => {
                    let widget = LengthWidget::initialize(LengthConverter, &panel)?;
                    print_fields(widget.fields());
                }
                Category::Temperature => {
                    let widget = TemperatureWidget::initialize(TemperatureConverter, &panel)?;
                    print_fields(widget.fields());
                }
                Category::Currency => {
                    let converter = currency_converter(&settings)?;
                    let widget = CurrencyWidget::initialize(converter, &panel).await;
                    print_fields(widget.fields());
                }
            }
        }
        Command::Units { category } => match category.parse::<Category>()? {
            Category::Length => print_units(get_length_units_command()),
            Category::Temperature => print_units(get_temperature_units_command()),
            Category::Currency => {
                let settings = get_settings_or_default(settings_path).await;
                let converter = currency_converter(&settings)?;
                converter.provider().get_rates().await;
                print_units(get_currency_units_command(&converter));
            }
        },
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
