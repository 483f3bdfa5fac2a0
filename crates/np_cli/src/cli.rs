use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};
use np_core::analytics::{ArticleStats, Tally};
use np_core::{paginate, ArticleFilter, Category, DashboardConfig, PayoutService, Principal, Result};
use np_export::{ExportFormat, ExportOptions, ReportTable};

use crate::logging::Logger;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Csv,
    Pdf,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Case-insensitive text to find in the title or author
    #[arg(long)]
    pub keyword: Option<String>,
    /// Exact author name
    #[arg(long)]
    pub author: Option<String>,
    /// Exact category, e.g. news or blog
    #[arg(long)]
    pub category: Option<String>,
    /// First publication day to include (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Last publication day to include (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> ArticleFilter {
        ArticleFilter {
            keyword: self.keyword.clone(),
            author: self.author.clone(),
            category: self.category.as_deref().map(Category::from),
            ..ArticleFilter::default()
        }
        .with_dates(self.from, self.to)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute author payouts and print or export them
    Payouts {
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
        /// Directory for exported files
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Show or change payout rates
    Rates {
        #[command(subcommand)]
        command: RateCommands,
    },
    /// List articles matching the filters
    Articles {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Article counts per category and per author
    Stats {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Serve the dashboard API over HTTP
    Serve {
        /// Listen address, overrides the configured one
        #[arg(long)]
        addr: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum RateCommands {
    /// Print the current rates
    Show,
    /// Change one category's rate (admin only)
    Set {
        category: String,
        #[arg(allow_negative_numbers = true)]
        rate: f64,
        /// E-mail of the signed-in user making the change
        #[arg(long = "as")]
        user: String,
    },
}

pub struct Context {
    pub service: PayoutService,
    pub config: DashboardConfig,
    pub logger: Logger,
}

impl Context {
    fn export_options(&self) -> ExportOptions {
        ExportOptions::from(&self.config.report)
    }
}

pub async fn handle_command(command: Commands, ctx: &Context) -> Result<()> {
    match command {
        Commands::Payouts { format, out } => {
            let report = ctx.service.report().await?;
            if report.skipped > 0 {
                ctx.logger
                    .warn(&format!("⚠️ {} malformed articles were left out", report.skipped));
            }
            let options = ctx.export_options();
            let format = match format {
                OutputFormat::Table => {
                    let table = ReportTable::from_report(&report, &options);
                    print!("{}", render_text_table(&table));
                    return Ok(());
                }
                OutputFormat::Csv => ExportFormat::Csv,
                OutputFormat::Pdf => ExportFormat::Pdf,
            };
            let bytes = np_export::export(&report, format, &options)?;
            tokio::fs::create_dir_all(&out).await?;
            let path = out.join(format.file_name());
            tokio::fs::write(&path, &bytes).await?;
            ctx.logger
                .info(&format!("💾 Wrote {} ({} bytes)", path.display(), bytes.len()));
        }
        Commands::Rates { command } => match command {
            RateCommands::Show => {
                let rates = ctx.service.load_rates().await?;
                for rate in rates.iter() {
                    println!("{:<12} {}", rate.category.as_str(), np_core::format_amount(rate.rate));
                }
            }
            RateCommands::Set {
                category,
                rate,
                user,
            } => {
                let principal = Principal::new(user);
                let rates = ctx
                    .service
                    .update_rate(&principal, &Category::from(category.as_str()), rate)
                    .await?;
                ctx.logger.info(&format!(
                    "✨ {} is now {}",
                    category,
                    rates.get(&Category::from(category.as_str())).unwrap_or(rate)
                ));
            }
        },
        Commands::Articles { filter, page } => {
            let articles = ctx.service.articles(&filter.to_filter()).await?;
            let page = paginate(&articles, page, ctx.config.articles_per_page);
            for article in &page.items {
                let date = article
                    .published_at
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "----------".to_string());
                println!("{}  [{}]  {}  ({})", date, article.category, article.title, article.author);
            }
            println!(
                "Page {} of {} ({} articles)",
                page.page, page.total_pages, page.total_items
            );
        }
        Commands::Stats { filter } => {
            let articles = ctx.service.articles(&filter.to_filter()).await?;
            let stats = ArticleStats::from_articles(&articles);
            println!("Articles: {}", stats.total);
            print_tallies("By category", &stats.by_category);
            print_tallies("By author", &stats.by_author);
        }
        Commands::Serve { addr } => {
            let addr = addr.unwrap_or_else(|| ctx.config.listen_addr.clone());
            let state = np_web::AppState {
                service: ctx.service.clone(),
                export: ctx.export_options(),
                articles_per_page: ctx.config.articles_per_page,
            };
            np_web::serve(state, &addr).await?;
        }
    }
    Ok(())
}

fn print_tallies(title: &str, tallies: &[Tally]) {
    println!("{}:", title);
    for tally in tallies {
        println!("  {:<40} {}", tally.name, tally.count);
    }
}

/// Plain-text rendition for the terminal; numbers are right-aligned.
pub fn render_text_table(table: &ReportTable) -> String {
    let mut widths: Vec<usize> = table.header.iter().map(|h| h.chars().count()).collect();
    for row in table.body() {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |row: &[String]| -> String {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, width))| {
                let pad = width - cell.chars().count();
                if i == 0 {
                    format!("{}{}", cell, " ".repeat(pad))
                } else {
                    format!("{}{}", " ".repeat(pad), cell)
                }
            })
            .collect();
        cells.join("  ").trim_end().to_string()
    };

    let mut out = String::new();
    out.push_str(&line(table.header.as_slice()));
    out.push('\n');
    out.push_str(&"-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));
    out.push('\n');
    for row in table.body() {
        out.push_str(&line(row.as_slice()));
        out.push('\n');
    }
    out
}
