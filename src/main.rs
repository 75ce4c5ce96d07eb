use clap::Parser;
use pool_route::adapters::customer_store::CsvCustomerStore;
use pool_route::adapters::directions::OrsDirections;
use pool_route::adapters::geocoder::NominatimGeocoder;
use pool_route::adapters::notifier::HttpEmailNotifier;
use pool_route::adapters::storage::LocalStorage;
use pool_route::config::cli::{ClientsCommand, Command};
use pool_route::core::calendar::{depot_today, service_day_on};
use pool_route::core::dispatch::Directions;
use pool_route::core::roster::NewCustomerRequest;
use pool_route::domain::model::Attachment;
use pool_route::utils::error::ErrorSeverity;
use pool_route::utils::{logger, validation::Validate};
use pool_route::{
    AppConfig, CliConfig, DailyRoute, Result, RosterManager, RouteDispatcher, RouteError,
    RoutePlanner,
};
use std::path::Path;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = run(cli).await {
        tracing::error!(
            "❌ pool-route failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }
}

async fn run(cli: CliConfig) -> Result<()> {
    let config = AppConfig::load_or_default(&cli.config)?;
    config.validate()?;
    tracing::info!("📁 Using roster in {}", config.storage.data_dir);

    let store = CsvCustomerStore::new(LocalStorage::new(&config.storage.data_dir));

    match cli.command {
        Command::Route {
            day,
            no_directions,
            json,
        } => {
            let Some(day) = day.or_else(|| service_day_on(depot_today(config.utc_offset()))) else {
                let today = depot_today(config.utc_offset()).format("%A");
                println!("No customers scheduled for {}.", today);
                return Ok(());
            };

            let mut dispatcher = build_dispatcher(&config, store)?;
            if !no_directions {
                if let Some(directions) = &config.directions {
                    dispatcher = dispatcher.with_directions(OrsDirections::new(
                        &directions.endpoint,
                        &directions.api_key,
                        &directions.profile,
                        directions.timeout(),
                    )?);
                }
            }

            let route = dispatcher.todays_route(day).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&route)?);
            } else {
                print_route(&route);
            }
        }
        Command::Clients(command) => {
            let geocoder = NominatimGeocoder::new(
                &config.geocoder.endpoint,
                &config.geocoder.user_agent,
                config.geocoder_timeout(),
            )?;
            let roster = RosterManager::new(store, geocoder);
            run_clients(&roster, command).await?;
        }
        Command::Start { id } => {
            let dispatcher = build_dispatcher(&config, store)?;
            let customer = dispatcher.start_cleaning(id).await?;
            println!("✅ Started cleaning {}!", customer.name);
        }
        Command::Finish { id, notes, photo } => {
            let mut dispatcher = build_dispatcher(&config, store)?;
            if let Some(notifier) = &config.notifier {
                dispatcher = dispatcher.with_notifier(HttpEmailNotifier::new(
                    &notifier.endpoint,
                    &notifier.api_key,
                    &notifier.sender,
                    notifier.timeout(),
                )?);
            }

            let attachment = match photo {
                Some(path) => Some(read_attachment(&path).await?),
                None => None,
            };
            if !dispatcher.finish_stop(id, &notes, attachment).await? {
                return Err(RouteError::ReportRejected {
                    customer: format!("customer #{}", id),
                });
            }
            println!("📧 Service report sent!");
        }
    }

    Ok(())
}

fn build_dispatcher(
    config: &AppConfig,
    store: CsvCustomerStore<LocalStorage>,
) -> Result<RouteDispatcher<CsvCustomerStore<LocalStorage>>> {
    let planner = RoutePlanner::new(config.depot(), config.depot.distance_unit)?;
    Ok(RouteDispatcher::new(store, planner).with_company_name(&config.company.name))
}

async fn run_clients(
    roster: &RosterManager<CsvCustomerStore<LocalStorage>, NominatimGeocoder>,
    command: ClientsCommand,
) -> Result<()> {
    match command {
        ClientsCommand::List => {
            let listing = roster.list().await?;
            if listing.customers.is_empty() && listing.warnings.is_empty() {
                println!("No customers yet.");
            }
            for warning in &listing.warnings {
                println!("⚠️  {}", warning);
            }
            for customer in listing.customers {
                let location = customer
                    .coordinate
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "unmapped".to_string());
                println!(
                    "#{:<4} {:<24} {:<9} {:<8} {} <{}> [{}]",
                    customer.id.0,
                    customer.name,
                    customer.service_day,
                    if customer.active { "active" } else { "inactive" },
                    customer.address,
                    customer.email,
                    location
                );
            }
        }
        ClientsCommand::Add {
            name,
            address,
            email,
            day,
        } => {
            let customer = roster
                .add_customer(NewCustomerRequest {
                    name,
                    address,
                    email,
                    service_day: day,
                })
                .await?;
            println!("✅ Added {} (#{})!", customer.name, customer.id);
        }
        ClientsCommand::SetActive { id, active } => {
            roster.set_active(id, active).await?;
            println!("✅ Customer #{} status updated.", id);
        }
    }
    Ok(())
}

fn print_route(route: &DailyRoute) {
    println!("🧹 Route for {}", route.day);

    for warning in &route.warnings {
        println!("⚠️  {}", warning);
    }

    if route.is_empty() {
        println!("No customers scheduled for {}.", route.day);
        return;
    }

    for stop in &route.stops {
        println!(
            "\n{}. {} ({:.1} {})",
            stop.position,
            stop.customer.name,
            stop.distance,
            route.unit.suffix()
        );
        println!("   Address: {}", stop.customer.address);
        println!("   Email: {}", stop.customer.email);
        if stop.customer.cleaning_started {
            println!("   Cleaning started");
        }
        match &stop.directions {
            Directions::NotRequested => {}
            Directions::Available(steps) => {
                println!("   Directions:");
                for step in steps {
                    println!("     {} ({:.0} m)", step.instruction, step.distance_meters);
                }
            }
            Directions::Unavailable(message) => println!("   {}", message),
        }
    }
}

async fn read_attachment(path: &Path) -> Result<Attachment> {
    let data = tokio::fs::read(path).await?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "attachment".to_string());
    let content_type = match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("heic") => "image/heic",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    };

    Ok(Attachment {
        filename,
        content_type: content_type.to_string(),
        data,
    })
}
