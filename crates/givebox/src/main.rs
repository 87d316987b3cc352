//! `givebox` - CLI for the givebox donation tracker
//!
//! This binary provides the command-line interface for browsing campaigns,
//! making simulated donations and reviewing giving history.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use givebox::campaign::{Campaign, CATEGORIES};
use givebox::cli::{
    CampaignAddCommand, CampaignCommand, CampaignListCommand, Cli, Command, ConfigCommand,
    DonateCommand, DonationCommand, OutputFormat, TransparencyCommand, VolunteerCommand,
    VolunteerListCommand,
};
use givebox::format::{format_inr, format_percent};
use givebox::{
    dashboard::DashboardSummary, impact, init_logging, submit_donation, transparency, Config,
    DonationForm, DonationStore, SimulatedProcessor, TaxEstimate,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Validation reports on the file itself, so it must not depend on it loading
    if let Some(path) = cli.validation_target() {
        return validate_config(&path);
    }

    // Load configuration
    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;

    // Commands that never touch the store
    match &cli.command {
        Command::Config(cmd) => return handle_config(&config, cmd),
        Command::Tax { amount } => return handle_tax(&config, *amount),
        Command::Impact { amount } => {
            handle_impact(*amount);
            return Ok(());
        }
        Command::Transparency(cmd) => return handle_transparency(cmd),
        _ => {}
    }

    let mut store = DonationStore::open(&config).with_context(|| {
        format!("failed to open store at {}", config.database_path().display())
    })?;

    match cli.command {
        Command::Campaigns(cmd) => handle_campaigns(&mut store, cmd),
        Command::Donate(cmd) => handle_donate(&mut store, &config, cmd).await,
        Command::Donations(cmd) => handle_donations(&mut store, cmd),
        Command::Volunteer(cmd) => handle_volunteer(&mut store, cmd),
        Command::Dashboard(flag) => handle_dashboard(&store, &config, flag.json),
        Command::Status(flag) => handle_status(&store, &config, flag.json),
        Command::Reset { yes } => handle_reset(&mut store, &config, yes),
        Command::Config(_)
        | Command::Tax { .. }
        | Command::Impact { .. }
        | Command::Transparency(_) => Ok(()),
    }
}

fn handle_campaigns(store: &mut DonationStore, cmd: CampaignCommand) -> Result<()> {
    match cmd {
        CampaignCommand::List(list) => print_campaign_list(store, &list)?,
        CampaignCommand::Show { id, json } => {
            let campaign = store
                .campaign_by_id(&id)
                .ok_or_else(|| givebox::Error::CampaignNotFound(id.clone()))?;
            if json {
                println!("{}", serde_json::to_string_pretty(campaign)?);
            } else {
                print_campaign(campaign);
            }
        }
        CampaignCommand::Add(add) => {
            let campaign = campaign_from_args(store, add);
            let id = campaign.id.clone();
            store.add_campaign(campaign)?;
            println!("Added campaign {id}");
        }
        CampaignCommand::Update(update) => {
            let changes = update.update();
            if changes.is_empty() {
                bail!("nothing to update; pass at least one field");
            }
            if !store.update_campaign(&update.id, changes)? {
                return Err(givebox::Error::CampaignNotFound(update.id).into());
            }
            println!("Updated campaign {}", update.id);
        }
    }
    Ok(())
}

fn campaign_from_args(store: &DonationStore, add: CampaignAddCommand) -> Campaign {
    Campaign {
        id: add.id.unwrap_or_else(|| store.next_campaign_id()),
        title: add.title,
        description: add.description,
        category: add.category,
        target_amount: add.target,
        raised_amount: add.raised,
        donor_count: 0,
        image_url: add.image_url,
        is_urgent: add.urgent,
        end_date: add.end_date,
        location: add.location,
    }
}

fn print_campaign_list(store: &DonationStore, list: &CampaignListCommand) -> Result<()> {
    if let Some(category) = &list.category {
        if !CATEGORIES.contains(&category.as_str()) {
            info!(category, "Category is not one of the built-in categories");
        }
    }

    let campaigns = list.query().apply(store.campaigns());

    match list.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&campaigns)?),
        OutputFormat::Table => {
            println!(
                "{:<4} {:<32} {:<20} {:>12} {:>12} {:>7}",
                "ID", "TITLE", "CATEGORY", "RAISED", "TARGET", "FUNDED"
            );
            for c in &campaigns {
                println!(
                    "{:<4} {:<32} {:<20} {:>12} {:>12} {:>7}{}",
                    c.id,
                    truncate(&c.title, 32),
                    truncate(&c.category, 20),
                    format_inr(c.raised_amount),
                    format_inr(c.target_amount),
                    format_percent(c.progress()),
                    if c.is_urgent { "  URGENT" } else { "" }
                );
            }
            println!();
            println!("{} campaign(s)", campaigns.len());
        }
        OutputFormat::Plain => {
            for c in &campaigns {
                print_campaign(c);
                println!();
            }
        }
    }
    Ok(())
}

fn print_campaign(c: &Campaign) {
    println!("[{}] {}{}", c.id, c.title, if c.is_urgent { " (urgent)" } else { "" });
    if !c.description.is_empty() {
        println!("  {}", c.description);
    }
    println!("  Category:  {}", c.category);
    println!("  Location:  {}", c.location);
    println!(
        "  Raised:    {} of {} ({})",
        format_inr(c.raised_amount),
        format_inr(c.target_amount),
        format_percent(c.progress())
    );
    println!("  Donors:    {}", c.donor_count);
    println!("  Helps:     {} families", c.families_helped());
    if let Some(end) = c.end_date {
        println!("  Ends:      {end}");
    }
}

async fn handle_donate(store: &mut DonationStore, config: &Config, cmd: DonateCommand) -> Result<()> {
    let form = DonationForm {
        amount: cmd.amount,
        donor_name: cmd.name,
        donor_email: cmd.email,
        message: cmd.message,
        is_anonymous: cmd.anonymous,
        payment_method: cmd.method.into(),
    };
    let processor = SimulatedProcessor::from_config(config);

    if !cmd.json {
        println!("Processing {} via {}...", format_inr(form.amount), form.payment_method);
    }

    let donation =
        submit_donation(store, &processor, form, cmd.campaign.as_deref(), config).await?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&donation)?);
    } else {
        println!("Thank you, {}!", donation.display_name());
        println!("  Donation:     {}", donation.id);
        println!("  Amount:       {}", format_inr(donation.amount));
        println!("  Cause:        {}", donation.cause);
        if let Some(tx) = &donation.transaction_id {
            println!("  Transaction:  {tx}");
        }
        if let Some(benefit) = donation.tax_benefit {
            println!("  Tax benefit:  {} under 80G", format_inr(benefit));
        }
    }
    Ok(())
}

fn handle_donations(store: &mut DonationStore, cmd: DonationCommand) -> Result<()> {
    match cmd {
        DonationCommand::List { format } => {
            let donations = store.donations();
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(donations)?),
                OutputFormat::Table => {
                    println!(
                        "{:<20} {:<25} {:>10} {:<10} {:<26}",
                        "ID", "CAUSE", "AMOUNT", "STATUS", "DATE"
                    );
                    for d in donations {
                        println!(
                            "{:<20} {:<25} {:>10} {:<10} {:<26}",
                            d.id,
                            truncate(&d.cause, 25),
                            format_inr(d.amount),
                            d.status,
                            d.timestamp.format("%Y-%m-%d %H:%M UTC")
                        );
                    }
                    println!();
                    println!("{} donation(s)", donations.len());
                }
                OutputFormat::Plain => {
                    for d in donations {
                        println!(
                            "{} {} {} [{}] from {}",
                            d.id,
                            format_inr(d.amount),
                            d.cause,
                            d.status,
                            d.display_name()
                        );
                    }
                }
            }
        }
        DonationCommand::Status { id, status } => {
            let status = status.into();
            if !store.update_donation_status(&id, status)? {
                return Err(givebox::Error::DonationNotFound(id).into());
            }
            println!("Donation {id} is now {status}");
        }
    }
    Ok(())
}

fn handle_volunteer(store: &mut DonationStore, cmd: VolunteerCommand) -> Result<()> {
    match cmd {
        VolunteerCommand::List(list) => print_volunteer_board(store, &list)?,
        VolunteerCommand::Signup(signup) => {
            let recorded = store.sign_up(signup.id, signup.form())?;
            if signup.json {
                println!("{}", serde_json::to_string_pretty(&recorded)?);
            } else {
                let board = store.volunteer_board();
                let opportunity = board.iter().find(|o| o.id == recorded.opportunity_id);
                if let Some(o) = opportunity {
                    println!("Thank you, {}! You're signed up for {}.", recorded.name, o.title);
                    println!("  When:   {} ({})", o.date, o.time);
                    println!("  Where:  {}", o.location);
                    println!("  Places: {} of {} taken", o.volunteers, o.max_volunteers);
                }
            }
        }
    }
    Ok(())
}

fn print_volunteer_board(store: &DonationStore, list: &VolunteerListCommand) -> Result<()> {
    let board = store.volunteer_board();
    let opportunities = list.query().apply(&board);

    match list.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&opportunities)?),
        OutputFormat::Table => {
            println!(
                "{:<3} {:<28} {:<18} {:<22} {:<10} {:>7}",
                "ID", "TITLE", "CATEGORY", "LOCATION", "DATE", "PLACES"
            );
            for o in &opportunities {
                let places = format!("{}/{}", o.volunteers, o.max_volunteers);
                println!(
                    "{:<3} {:<28} {:<18} {:<22} {:<10} {:>7}{}",
                    o.id,
                    truncate(o.title, 28),
                    truncate(o.category, 18),
                    truncate(o.location, 22),
                    o.date,
                    places,
                    if o.is_full() {
                        "  FULL"
                    } else if o.is_urgent {
                        "  URGENT"
                    } else {
                        ""
                    }
                );
            }
            println!();
            println!("{} opportunities listed", opportunities.len());
        }
        OutputFormat::Plain => {
            for o in &opportunities {
                println!("[{}] {}{}", o.id, o.title, if o.is_urgent { " (urgent)" } else { "" });
                println!("  {}", o.description);
                println!("  Category:  {}", o.category);
                println!("  Where:     {}", o.location);
                println!("  When:      {} ({})", o.date, o.time);
                println!("  Skills:    {}", o.skills.join(", "));
                println!(
                    "  Places:    {}/{} ({} left)",
                    o.volunteers,
                    o.max_volunteers,
                    o.spots_left()
                );
                println!();
            }
        }
    }
    Ok(())
}

fn handle_dashboard(store: &DonationStore, config: &Config, json: bool) -> Result<()> {
    let summary = DashboardSummary::from_store(store, config.tax.deduction_percent);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Your Impact Dashboard");
    println!("=====================");
    println!();
    println!("Total donated:    {}", format_inr(summary.total_donated));
    println!("Donations:        {} ({} completed)", summary.donation_count, summary.completed_count);
    println!("Families helped:  {}", summary.total_impact);
    println!("Tax saved (80G):  {}", format_inr(summary.tax_saved));
    println!("Effective cost:   {}", format_inr(summary.effective_cost));

    if !summary.by_cause.is_empty() {
        println!();
        println!("By cause");
        for cause in &summary.by_cause {
            println!(
                "  {:<30} {:>3} x  {}",
                truncate(&cause.cause, 30),
                cause.count,
                format_inr(cause.amount)
            );
        }
    }

    if !summary.recent.is_empty() {
        println!();
        println!("Recent donations");
        for d in &summary.recent {
            println!(
                "  {}  {:<30} {:>10}  {}",
                d.timestamp.format("%Y-%m-%d"),
                truncate(&d.cause, 30),
                format_inr(d.amount),
                d.status
            );
        }
    }
    Ok(())
}

fn handle_transparency(cmd: &TransparencyCommand) -> Result<()> {
    let records = transparency::ledger();
    let matches = transparency::search(&records, &cmd.search);
    let allocation = transparency::fund_allocation();

    if cmd.json {
        let out = serde_json::json!({
            "records": matches,
            "allocation": allocation,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Fund Allocation");
    println!("---------------");
    println!("Total raised:     {}", format_inr(allocation.total_raised));
    println!(
        "Total allocated:  {} ({})",
        format_inr(allocation.total_allocated),
        format_percent(allocation.allocated_percent())
    );
    for category in &allocation.categories {
        println!(
            "  {:<20} {:>12} {:>4}%",
            category.name,
            format_inr(category.amount),
            category.percentage
        );
    }

    println!();
    println!("Ledger ({} record(s))", matches.len());
    println!("------");
    for record in matches {
        let block = record
            .block_number
            .map_or_else(|| "-".to_string(), |b| b.to_string());
        println!(
            "{}  {}  {}  {}",
            record.id,
            record.donor_id,
            format_inr(record.amount),
            record.campaign
        );
        println!("  Block: {block}  Time: {}", record.timestamp);
        for usage in &record.usage {
            println!(
                "  {} {:<28} {:>10}",
                if usage.verified { "[x]" } else { "[ ]" },
                usage.item,
                format_inr(usage.amount)
            );
        }
        println!(
            "  Verified: {}  Unallocated: {}",
            format_inr(record.verified_amount()),
            format_inr(record.unallocated_amount())
        );
    }
    Ok(())
}

fn handle_tax(config: &Config, amount: u64) -> Result<()> {
    let estimate = TaxEstimate::new(amount, config.tax.deduction_percent);
    println!("Donation amount:  {}", format_inr(estimate.amount));
    println!("Tax benefit:      {}", format_inr(estimate.benefit));
    println!("Effective cost:   {}", format_inr(estimate.effective_cost));
    println!("You save:         {}", format_percent(estimate.saving_percent));
    Ok(())
}

fn handle_impact(amount: Option<u64>) {
    match amount {
        Some(amount) => {
            println!("{} can provide:", format_inr(amount));
            for e in impact::estimate(amount) {
                println!(
                    "  {:<20} {:>4} x  {} (per {})",
                    e.item.title,
                    e.units,
                    e.item.outcome,
                    format_inr(e.item.unit_cost)
                );
            }
        }
        None => {
            for item in impact::IMPACT_ITEMS {
                println!(
                    "  {:>8}  {:<20} {}",
                    format_inr(item.unit_cost),
                    item.title,
                    item.outcome
                );
            }
        }
    }
}

fn handle_status(store: &DonationStore, config: &Config, json: bool) -> Result<()> {
    let stats = store.storage().map(givebox::Storage::stats).transpose()?;

    if json {
        let status = serde_json::json!({
            "persistent": store.is_persistent(),
            "database_path": config.database_path(),
            "campaigns": store.campaigns().len(),
            "donations": store.donations().len(),
            "total_donated": store.total_donated(),
            "total_impact": store.total_impact(),
            "db_size_bytes": stats.as_ref().map(|s| s.db_size_bytes),
            "oldest_donation": stats.as_ref().and_then(|s| s.oldest_donation),
            "newest_donation": stats.as_ref().and_then(|s| s.newest_donation),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("givebox status");
        println!("--------------");
        if store.is_persistent() {
            println!("Database:       {}", config.database_path().display());
        } else {
            println!("Database:       (in memory, not persisted)");
        }
        println!("Campaigns:      {}", store.campaigns().len());
        println!("Donations:      {}", store.donations().len());
        println!("Total donated:  {}", format_inr(store.total_donated()));
        println!("Families:       {}", store.total_impact());
        if let Some(stats) = stats {
            println!("Size:           {} bytes", stats.db_size_bytes);
            if let Some(newest) = stats.newest_donation {
                println!("Last donation:  {}", newest.format("%Y-%m-%d %H:%M UTC"));
            }
        }
    }
    Ok(())
}

fn handle_reset(store: &mut DonationStore, config: &Config, yes: bool) -> Result<()> {
    if !yes {
        println!("This will delete all donations and campaign changes.");
        println!("Use --yes to confirm.");
        return Ok(());
    }
    store.reset(config.storage.seed_fixtures)?;
    println!("Store reset.");
    Ok(())
}

fn handle_config(config: &Config, cmd: &ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if *json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Persist:            {}", config.storage.persist);
                println!("  Seed campaigns:     {}", config.storage.seed_fixtures);
                println!();
                println!("[Donation]");
                println!("  Minimum amount:     {}", format_inr(config.donation.min_amount));
                println!("  Maximum amount:     {}", format_inr(config.donation.max_amount));
                println!("  Default cause:      {}", config.donation.default_cause);
                println!();
                println!("[Payment]");
                println!("  Processing delay:   {} ms", config.payment.processing_delay_ms);
                println!();
                println!("[Tax]");
                println!("  Deduction percent:  {}", config.tax.deduction_percent);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        // Handled before configuration is loaded
        ConfigCommand::Validate { .. } => {}
    }
    Ok(())
}

fn validate_config(path: &Path) -> Result<()> {
    println!("Validating configuration: {}", path.display());
    Config::load_file(path)
        .with_context(|| format!("configuration {} is invalid", path.display()))?;
    println!("Configuration is valid.");
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
