//! finanzas CLI entry point.

use std::env;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use finanzas_client::cache::{FileSlot, MemoryCache, MemoryPubSub};
use finanzas_client::cli::{Cli, Commands, DashboardArgs, OutputFormat};
use finanzas_client::client::{
    with_timeout_fallback, CreateCategoryRequest, CreateRecurringRequest,
    CreateTransactionRequest, Insights,
};
use finanzas_client::config::{resolve_environment, Config, OverrideStore};
use finanzas_client::gateway::{CachedDataGateway, ChangeListener, DEFAULT_SEEN_CAPACITY};
use finanzas_client::output::{format_output, pretty};
use finanzas_client::FinanzasClient;
use finanzas_core::cache::ResourceType;
use finanzas_core::finance::{project_monthly, TransactionKind};
use finanzas_core::period::{filter_by_period, FilterParams, PeriodResolver, YearMonth};

type Gateway = CachedDataGateway<MemoryCache, MemoryPubSub>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so JSON output stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "finanzas_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    let overrides = OverrideStore::default_location()?;
    let forced = overrides.load().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "Ignoring unreadable forced environment");
        None
    });
    let hostname = env::var("FINANZAS_HOSTNAME").ok();
    let (environment, source) = resolve_environment(
        cli.environment.map(Into::into),
        forced,
        hostname.as_deref(),
    );
    let urls = environment
        .service_urls()
        .with_overrides(|name| env::var(name).ok())?;
    tracing::debug!(%environment, ?source, "Resolved environment");

    let client = FinanzasClient::new(urls);
    let slot = config.slot_path().map(|path| Arc::new(FileSlot::new(path)));
    let mut gateway = CachedDataGateway::new(
        Arc::new(MemoryCache::new(config.cache_max_entries)),
        Arc::new(MemoryPubSub::new()),
        config.cache_ttl(),
    )
    .with_notify_delay(config.notify_delay());
    if let Some(slot) = &slot {
        gateway = gateway.with_slot(slot.clone());
    }

    let mut resolver = PeriodResolver::new();
    if cli.hide_balances {
        resolver.toggle_balances_visibility();
    }

    match cli.command {
        Commands::Dashboard(args) => {
            select_period(&gateway, &client, &mut resolver, &args).await?;
            let dashboard = gateway
                .load_dashboard_data(&client, &resolver.get_filter_params(), !args.legacy)
                .await?;
            match cli.format {
                OutputFormat::Json => println!("{}", format_output(&dashboard, cli.format)),
                OutputFormat::Pretty => {
                    println!("{}", pretty::format_dashboard(&dashboard, &resolver))
                }
            }
        }
        Commands::Periods => {
            select_period(&gateway, &client, &mut resolver, &DashboardArgs::default()).await?;
            match cli.format {
                OutputFormat::Json => println!(
                    "{}",
                    format_output(
                        &serde_json::json!({
                            "years": resolver.available_years(),
                            "months": resolver.available_months(),
                            "selected": resolver.get_filter_params(),
                        }),
                        cli.format
                    )
                ),
                OutputFormat::Pretty => println!("{}", pretty::format_periods(&resolver)),
            }
        }
        Commands::Expenses(cmd) => {
            run_transactions(
                &gateway,
                &client,
                &resolver,
                TransactionKind::Expense,
                cmd.action,
                cli.format,
                cli.quiet,
            )
            .await?;
        }
        Commands::Incomes(cmd) => {
            run_transactions(
                &gateway,
                &client,
                &resolver,
                TransactionKind::Income,
                cmd.action,
                cli.format,
                cli.quiet,
            )
            .await?;
        }
        Commands::Categories(categories_cmd) => {
            use finanzas_client::cli::categories::CategoriesAction;
            match categories_cmd.action {
                CategoriesAction::List => {
                    let categories = gateway.load_categories(&client).await.unwrap_or_else(|err| {
                        tracing::error!(error = %err, "Failed to load categories");
                        Vec::new()
                    });
                    match cli.format {
                        OutputFormat::Json => println!("{}", format_output(&categories, cli.format)),
                        OutputFormat::Pretty => println!("{}", pretty::format_categories(&categories)),
                    }
                }
                CategoriesAction::Create { name, kind, color } => {
                    let category = client
                        .create_category(&CreateCategoryRequest {
                            name,
                            kind: kind.map(Into::into),
                            color,
                        })
                        .await?;
                    gateway.invalidate_after_mutation(&ResourceType::Category).await;
                    match cli.format {
                        OutputFormat::Json => println!("{}", format_output(&category, cli.format)),
                        OutputFormat::Pretty => {
                            println!("Created:\n{}", pretty::format_category(&category))
                        }
                    }
                }
                CategoriesAction::Delete { id } => {
                    client.delete_category(&id).await?;
                    gateway.invalidate_after_mutation(&ResourceType::Category).await;
                    if !cli.quiet {
                        println!("Deleted category {}", id);
                    }
                }
            }
        }
        Commands::Recurring(recurring_cmd) => {
            use finanzas_client::cli::recurring::RecurringAction;
            match recurring_cmd.action {
                RecurringAction::List => {
                    let items = gateway.load_recurring(&client).await.unwrap_or_else(|err| {
                        tracing::error!(error = %err, "Failed to load recurring transactions");
                        Vec::new()
                    });
                    match cli.format {
                        OutputFormat::Json => println!("{}", format_output(&items, cli.format)),
                        OutputFormat::Pretty => {
                            println!("{}", pretty::format_recurring(&items, &resolver))
                        }
                    }
                }
                RecurringAction::Create {
                    kind,
                    amount,
                    frequency,
                    description,
                    category_id,
                    start_date,
                } => {
                    let created = client
                        .create_recurring(&CreateRecurringRequest {
                            kind: kind.into(),
                            amount,
                            frequency: frequency.into(),
                            description,
                            category_id,
                            start_date,
                        })
                        .await?;
                    gateway
                        .invalidate_after_mutation(&ResourceType::RecurringTransaction)
                        .await;
                    match cli.format {
                        OutputFormat::Json => println!("{}", format_output(&created, cli.format)),
                        OutputFormat::Pretty => {
                            println!("Created:\n{}", format_output(&created, cli.format))
                        }
                    }
                }
                RecurringAction::Delete { id } => {
                    client.delete_recurring(&id).await?;
                    gateway
                        .invalidate_after_mutation(&ResourceType::RecurringTransaction)
                        .await;
                    if !cli.quiet {
                        println!("Deleted recurring transaction {}", id);
                    }
                }
                RecurringAction::Execute { id } => {
                    let result = client.execute_recurring(&id).await?;
                    gateway
                        .invalidate_after_mutation(&ResourceType::RecurringTransaction)
                        .await;
                    match cli.format {
                        OutputFormat::Json => println!("{}", format_output(&result, cli.format)),
                        OutputFormat::Pretty => {
                            if !cli.quiet {
                                println!("Executed recurring transaction {}", id);
                            }
                        }
                    }
                }
                RecurringAction::Projection => {
                    let items = gateway.load_recurring(&client).await?;
                    let projection = project_monthly(&items);
                    match cli.format {
                        OutputFormat::Json => println!("{}", format_output(&projection, cli.format)),
                        OutputFormat::Pretty => {
                            println!("{}", pretty::format_projection(&projection, &resolver))
                        }
                    }
                }
            }
        }
        Commands::Budgets(_) => {
            let budgets = gateway.load_budgets(&client).await.unwrap_or_else(|err| {
                tracing::error!(error = %err, "Failed to load budgets");
                Vec::new()
            });
            match cli.format {
                OutputFormat::Json => println!("{}", format_output(&budgets, cli.format)),
                OutputFormat::Pretty => println!("{}", pretty::format_budgets(&budgets, &resolver)),
            }
        }
        Commands::Goals(_) => {
            let goals = gateway.load_savings_goals(&client).await.unwrap_or_else(|err| {
                tracing::error!(error = %err, "Failed to load savings goals");
                Vec::new()
            });
            match cli.format {
                OutputFormat::Json => println!("{}", format_output(&goals, cli.format)),
                OutputFormat::Pretty => println!("{}", pretty::format_goals(&goals, &resolver)),
            }
        }
        Commands::Insights(args) => {
            select_period(&gateway, &client, &mut resolver, &args).await?;
            let params = resolver.get_filter_params();
            let dashboard = gateway.load_dashboard_data(&client, &params, true).await?;
            let recurring = gateway.load_recurring(&client).await.unwrap_or_else(|err| {
                tracing::warn!(error = %err, "Recurring transactions unavailable for insights");
                Vec::new()
            });
            let projection = project_monthly(&recurring);
            let insights = with_timeout_fallback(
                config.insights_timeout(),
                client.fetch_insights(&params),
                || Insights::fallback(&dashboard.summary, &projection),
            )
            .await;
            match cli.format {
                OutputFormat::Json => println!("{}", format_output(&insights, cli.format)),
                OutputFormat::Pretty => {
                    println!("{}\n{}", resolver.get_period_title(), pretty::format_insights(&insights))
                }
            }
        }
        Commands::Watch(args) => {
            let Some(slot) = slot.as_ref() else {
                bail!("No directory for the change slot; set FINANZAS_SLOT_DIR");
            };
            let _watcher = slot.watch(Arc::clone(gateway.pubsub()))?;
            let mut listener =
                ChangeListener::deduplicating(gateway.subscribe().await?, DEFAULT_SEEN_CAPACITY);

            select_period(&gateway, &client, &mut resolver, &args).await?;
            render_watch(&gateway, &client, &resolver, &args, cli.format).await;
            if !cli.quiet {
                eprintln!("Watching {} for changes...", slot.path().display());
            }

            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => break,
                    notification = listener.next() => {
                        let Some(notification) = notification else { break };
                        tracing::info!(
                            resource = %notification.resource,
                            delayed = notification.is_delayed(),
                            "Data changed, reloading"
                        );
                        gateway.invalidate(&notification.resource).await;
                        select_period(&gateway, &client, &mut resolver, &args).await?;
                        render_watch(&gateway, &client, &resolver, &args, cli.format).await;
                    }
                }
            }
        }
        Commands::Env(env_cmd) => {
            use finanzas_client::cli::environment::EnvAction;
            match env_cmd.action {
                EnvAction::Show => match cli.format {
                    OutputFormat::Json => println!(
                        "{}",
                        format_output(
                            &serde_json::json!({
                                "environment": environment.as_str(),
                                "source": source,
                                "urls": client.urls(),
                            }),
                            cli.format
                        )
                    ),
                    OutputFormat::Pretty => println!(
                        "{}",
                        pretty::format_environment(environment, source, client.urls())
                    ),
                },
                EnvAction::Force { environment } => {
                    let environment = environment.into();
                    overrides.force(environment)?;
                    if !cli.quiet {
                        println!("Forced environment {}", environment);
                    }
                }
                EnvAction::Reset => {
                    let removed = overrides.reset()?;
                    if !cli.quiet {
                        if removed {
                            println!("Cleared forced environment");
                        } else {
                            println!("No forced environment set");
                        }
                    }
                }
            }
        }
        Commands::Cache(_) => {
            gateway
                .invalidate_after_mutation(&ResourceType::from("cache"))
                .await;
            if !cli.quiet {
                println!("Cache cleared");
            }
        }
    }

    gateway.flush_notifications().await;
    Ok(())
}

/// Applies the requested period, then refreshes the available periods.
///
/// Without an explicit selection the resolver picks the latest month with
/// data.
async fn select_period(
    gateway: &Gateway,
    client: &FinanzasClient,
    resolver: &mut PeriodResolver,
    args: &DashboardArgs,
) -> Result<()> {
    if let Some(year) = args.year {
        match args.month {
            Some(month) => resolver.select_month(YearMonth::new(year, month)?),
            None => resolver.select_year(year),
        }
    }

    gateway.refresh_available_periods(client, resolver).await;

    if args.all {
        resolver.clear_filters();
    }
    Ok(())
}

async fn render_watch(
    gateway: &Gateway,
    client: &FinanzasClient,
    resolver: &PeriodResolver,
    args: &DashboardArgs,
    format: OutputFormat,
) {
    match gateway
        .load_dashboard_data(client, &resolver.get_filter_params(), !args.legacy)
        .await
    {
        Ok(dashboard) => match format {
            OutputFormat::Json => println!("{}", format_output(&dashboard, format)),
            OutputFormat::Pretty => println!("{}\n", pretty::format_dashboard(&dashboard, resolver)),
        },
        Err(err) => tracing::error!(error = %err, "Failed to reload dashboard"),
    }
}

async fn run_transactions(
    gateway: &Gateway,
    client: &FinanzasClient,
    resolver: &PeriodResolver,
    kind: TransactionKind,
    action: finanzas_client::cli::transactions::TransactionsAction,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    use finanzas_client::cli::transactions::TransactionsAction;

    let resource = match kind {
        TransactionKind::Expense => ResourceType::Expense,
        TransactionKind::Income => ResourceType::Income,
    };

    match action {
        TransactionsAction::List { year, month } => {
            let transactions = gateway.load_transactions(client, kind).await.unwrap_or_else(|err| {
                tracing::error!(error = %err, kind = kind.plural(), "Failed to load transactions");
                Vec::new()
            });
            let period = FilterParams { year, month }.period();
            let selected = filter_by_period(&transactions, &period);
            match format {
                OutputFormat::Json => println!("{}", format_output(&selected, format)),
                OutputFormat::Pretty => {
                    println!("{}", pretty::format_transactions(kind, &selected, resolver))
                }
            }
        }
        TransactionsAction::Create {
            amount,
            description,
            category_id,
            date,
        } => {
            let transaction = client
                .create_transaction(
                    kind,
                    &CreateTransactionRequest {
                        amount,
                        description,
                        category_id,
                        date,
                    },
                )
                .await?;
            gateway.invalidate_after_mutation(&resource).await;
            match format {
                OutputFormat::Json => println!("{}", format_output(&transaction, format)),
                OutputFormat::Pretty => {
                    println!("Created:\n{}", pretty::format_transaction(&transaction, resolver))
                }
            }
        }
        TransactionsAction::Delete { id } => {
            client.delete_transaction(kind, &id).await?;
            gateway.invalidate_after_mutation(&resource).await;
            if !quiet {
                println!("Deleted {} {}", resource, id);
            }
        }
    }
    Ok(())
}
