use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

use pakads_admin::models::ads::AdDraft;
use pakads_admin::models::notices::NoticeDraft;
use pakads_admin::repositories::{ApiError, Repositories, TokenStore};
use pakads_admin::services::auth::AuthGate;
use pakads_admin::services::console::{run_console, Screens, Tab};
use pakads_admin::services::ServiceError;
use pakads_admin::settings::Settings;
use pakads_admin::views::users::UserTab;
use pakads_admin::views::{Screen, StatusFilter};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config.toml")]
    config: String,
    #[arg(long, default_value = "log4rs.yaml")]
    log4rs: String,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(ClapArgs, Clone, Debug, Default)]
struct ListArgs {
    /// Case-insensitive text search.
    #[arg(short, long)]
    search: Option<String>,
    /// Status filter; `all` shows everything.
    #[arg(long, default_value = "all")]
    status: String,
}

#[derive(ClapArgs, Clone, Debug, Default)]
struct AdFields {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    link: Option<String>,
    #[arg(long)]
    placement: Option<String>,
    #[arg(long)]
    image_url: Option<String>,
    #[arg(long)]
    price: Option<f64>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    location: Option<String>,
}

impl AdFields {
    fn into_draft(self, base: AdDraft) -> AdDraft {
        AdDraft {
            title: self.title.unwrap_or(base.title),
            description: self.description.unwrap_or(base.description),
            link: self.link.or(base.link),
            placement: self.placement.or(base.placement),
            image_url: self.image_url.or(base.image_url),
            price: self.price.or(base.price),
            category_id: self.category.or(base.category_id),
            location_id: self.location.or(base.location_id),
        }
    }
}

#[derive(ClapArgs, Clone, Debug, Default)]
struct NoticeFields {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    content: Option<String>,
    /// Notice type, e.g. `general` or `phone`.
    #[arg(long = "type")]
    kind: Option<String>,
    #[arg(long)]
    priority: Option<String>,
    #[arg(long)]
    inactive: bool,
}

impl NoticeFields {
    fn into_draft(self) -> NoticeDraft {
        NoticeDraft {
            kind: self.kind,
            title: self.title,
            content: self.content,
            priority: self.priority,
            is_active: self.inactive.then_some(false),
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and store the session token.
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "PAKADS_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Drop the stored session.
    Logout,
    /// Show the signed-in admin.
    Whoami,
    /// Interactive console (the default).
    Console,
    Dashboard {
        /// Show every notification instead of the latest three.
        #[arg(long)]
        all_notifications: bool,
    },
    AccountRequests {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long, conflicts_with = "reject")]
        approve: Option<String>,
        #[arg(long)]
        reject: Option<String>,
    },
    WithdrawalRequests {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long, conflicts_with_all = ["reject", "sent"])]
        approve: Option<String>,
        #[arg(long, conflicts_with = "sent")]
        reject: Option<String>,
        #[arg(long)]
        reason: Option<String>,
        /// Mark a withdrawal as sent.
        #[arg(long)]
        sent: Option<String>,
    },
    Deposits {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Show the details of one deposit.
        #[arg(long)]
        show: Option<String>,
        #[arg(long, conflicts_with = "reject")]
        approve: Option<String>,
        #[arg(long)]
        reject: Option<String>,
        #[arg(long)]
        reason: Option<String>,
    },
    ManageUsers {
        #[command(flatten)]
        list: ListArgs,
        /// `all`, `active` or `with-balance`.
        #[arg(long, default_value = "all")]
        tab: String,
        /// Show the details of one user.
        #[arg(long)]
        show: Option<String>,
        #[arg(long)]
        delete: Option<String>,
    },
    RewardIncome {
        /// Show the commission breakdown of one user.
        #[arg(long)]
        user: Option<String>,
    },
    Leaderboard,
    AdsManager {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long)]
        create: bool,
        #[arg(long, conflicts_with = "create")]
        update: Option<String>,
        #[command(flatten)]
        fields: AdFields,
        /// Approve an inactive ad or reject an active one.
        #[arg(long)]
        toggle: Option<String>,
        #[arg(long)]
        feature: Option<String>,
        #[arg(long)]
        delete: Option<String>,
    },
    Notice {
        #[arg(short, long)]
        search: Option<String>,
        /// List only the notices currently published.
        #[arg(long)]
        active: bool,
        #[arg(long)]
        create: bool,
        #[arg(long, conflicts_with = "create")]
        update: Option<String>,
        #[command(flatten)]
        fields: NoticeFields,
        #[arg(long)]
        toggle: Option<String>,
        #[arg(long)]
        delete: Option<String>,
    },
    Bonus {
        /// Filter history by date text.
        #[arg(short, long)]
        search: Option<String>,
        /// Run the daily bonus check and award.
        #[arg(long)]
        award: bool,
    },
    /// Upload an image, or delete a previously uploaded file.
    Upload {
        file: Option<PathBuf>,
        #[arg(long, conflicts_with = "file")]
        delete: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    init_logging(&args.log4rs)?;
    let settings = Settings::new(&args.config)?;
    if settings.api.base_url.is_empty() {
        return Err(anyhow!(
            "api.base_url is not set; add it to {} or set PAKADS_API__BASE_URL",
            args.config
        ));
    }

    let tokens = match settings.token_file() {
        Some(path) => TokenStore::open(path).await,
        None => {
            log::warn!("No session directory available; the session will not persist.");
            TokenStore::in_memory()
        }
    };
    let repos = Repositories::new(&settings, tokens)?;
    log::debug!("Using API root {}", settings.api_root());

    match args.command.unwrap_or(Command::Console) {
        Command::Login { email, password } => {
            let mut gate = AuthGate::new(repos.auth.clone(), repos.tokens().clone());
            let identity = gate.login(&email, &password).await?;
            println!(
                "Signed in as {}",
                identity.email.as_deref().unwrap_or(&email)
            );
        }
        Command::Logout => {
            let mut gate = AuthGate::new(repos.auth.clone(), repos.tokens().clone());
            gate.logout().await?;
            println!("Signed out.");
        }
        Command::Whoami => {
            let gate = authenticated(&repos).await?;
            let identity = gate.identity().cloned().unwrap_or_default();
            println!(
                "{} <{}> role={}",
                identity.name.as_deref().unwrap_or("admin"),
                identity.email.as_deref().unwrap_or(""),
                identity.role.as_deref().unwrap_or("")
            );
        }
        Command::Console => {
            run_console(&repos, settings.deposits.page_size).await?;
        }
        Command::Upload { file, delete } => {
            authenticated(&repos).await?;
            match (file, delete) {
                (_, Some(filename)) => {
                    repos.upload.delete(&filename).await?;
                    println!("Deleted {filename}");
                }
                (Some(file), None) => {
                    let uploaded = repos.upload.upload_image(&file).await?;
                    println!(
                        "{}",
                        uploaded.url.or(uploaded.filename).unwrap_or_default()
                    );
                }
                (None, None) => return Err(anyhow!("pass a file to upload or --delete <filename>")),
            }
        }
        command => {
            authenticated(&repos).await?;
            let mut screens = Screens::new(&repos, settings.deposits.page_size);
            let run = run_screen(&mut screens, command).await?;
            let screen = screens.screen(run.tab);
            println!("== {} ==\n{}", screen.title(), screen.render());
            run.action.map_err(|e| anyhow!("Action failed: {e}"))?;
        }
    }

    Ok(())
}

async fn authenticated(repos: &Repositories) -> Result<AuthGate, ServiceError> {
    let mut gate = AuthGate::new(repos.auth.clone(), repos.tokens().clone());
    gate.check().await;
    if !gate.is_authenticated() {
        return Err(ServiceError::Unauthenticated);
    }
    Ok(gate)
}

fn apply_list(screen: &mut dyn Screen, list: ListArgs) {
    if let Some(search) = list.search {
        screen.set_search(&search);
    }
    screen.set_status(StatusFilter::parse(&list.status));
}

/// The screen to print and the result of the action applied to it.
struct ScreenRun {
    tab: Tab,
    action: Result<(), ApiError>,
}

/// Loads one screen and applies the requested action. The action's failure
/// stays on the screen's banner and is also returned so the process can exit
/// non-zero after printing.
async fn run_screen(screens: &mut Screens, command: Command) -> Result<ScreenRun> {
    let mut action = Ok(());
    let tab = match command {
        Command::Dashboard { all_notifications } => {
            let view = &mut screens.dashboard;
            view.show_all_notifications = all_notifications;
            view.load().await;
            Tab::Dashboard
        }
        Command::AccountRequests { list, approve, reject } => {
            let view = &mut screens.account_requests;
            view.load().await;
            if let Some(id) = approve {
                action = view.approve(&id).await;
            } else if let Some(id) = reject {
                action = view.reject(&id).await;
            }
            apply_list(view, list);
            Tab::AccountRequests
        }
        Command::WithdrawalRequests { list, approve, reject, reason, sent } => {
            let view = &mut screens.withdrawals;
            view.load().await;
            if let Some(id) = approve {
                action = view.approve(&id).await;
            } else if let Some(id) = reject {
                action = view.reject(&id, reason.as_deref()).await;
            } else if let Some(id) = sent {
                action = view.mark_sent(&id).await;
            }
            apply_list(view, list);
            Tab::WithdrawalRequests
        }
        Command::Deposits { list, page, show, approve, reject, reason } => {
            let view = &mut screens.deposits;
            view.load().await;
            if let Some(id) = &show {
                action = view.show(id).await;
            }
            if let Some(id) = approve {
                let result = view.approve(&id).await;
                action = action.and(result);
            } else if let Some(id) = reject {
                let result = view.reject(&id, reason.as_deref()).await;
                action = action.and(result);
            }
            apply_list(view, list);
            view.set_page(page);
            Tab::Deposits
        }
        Command::ManageUsers { list, tab, show, delete } => {
            let view = &mut screens.users;
            view.load().await;
            if let Some(id) = delete {
                action = view.delete(&id).await;
            }
            if let Some(id) = show {
                let result = view.show(&id).await;
                action = action.and(result);
            }
            if let Some(search) = list.search {
                view.set_search(&search);
            }
            view.tab = tab.parse::<UserTab>().map_err(|e| anyhow!(e))?;
            view.query.status = StatusFilter::parse(&list.status);
            Tab::ManageUsers
        }
        Command::RewardIncome { user } => {
            let view = &mut screens.reward_income;
            view.load().await;
            if let Some(id) = user {
                action = view.show_user(&id).await;
            }
            Tab::RewardIncome
        }
        Command::Leaderboard => {
            screens.leaderboard.load().await;
            Tab::Leaderboard
        }
        Command::AdsManager { list, create, update, fields, toggle, feature, delete } => {
            let view = &mut screens.ads;
            view.load().await;
            if create {
                let draft = fields.into_draft(AdDraft::default());
                action = view.create(&draft).await;
            } else if let Some(id) = update {
                let base = view.find(&id).map(AdDraft::from).unwrap_or_default();
                let draft = fields.into_draft(base);
                action = view.update(&id, &draft).await;
            } else if let Some(id) = toggle {
                action = view.toggle_status(&id).await;
            } else if let Some(id) = feature {
                action = view.feature(&id).await;
            } else if let Some(id) = delete {
                action = view.delete(&id).await;
            }
            apply_list(view, list);
            Tab::AdsManager
        }
        Command::Notice { search, active, create, update, fields, toggle, delete } => {
            let view = &mut screens.notices;
            view.active_only = active;
            view.load().await;
            if create {
                action = view.create(&fields.into_draft()).await;
            } else if let Some(id) = update {
                action = view.update(&id, &fields.into_draft()).await;
            } else if let Some(id) = toggle {
                action = view.toggle_active(&id).await;
            } else if let Some(id) = delete {
                action = view.delete(&id).await;
            }
            if let Some(search) = search {
                view.set_search(&search);
            }
            Tab::Notice
        }
        Command::Bonus { search, award } => {
            let view = &mut screens.bonus;
            view.load().await;
            if award {
                action = view.check_and_award().await;
            }
            if let Some(search) = search {
                view.set_search(&search);
            }
            Tab::Bonus
        }
        Command::Login { .. }
        | Command::Logout
        | Command::Whoami
        | Command::Console
        | Command::Upload { .. } => return Err(anyhow!("not a screen command")),
    };

    Ok(ScreenRun { tab, action })
}

fn init_logging(path: &str) -> Result<(), anyhow::Error> {
    if !Path::new(path).exists() {
        let stderr = ConsoleAppender::builder()
            .target(Target::Stderr)
            .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S)} {l} {t} - {m}{n}")))
            .build();
        let config = Config::builder()
            .appender(Appender::builder().build("stderr", Box::new(stderr)))
            .build(Root::builder().appender("stderr").build(LevelFilter::Warn))?;
        log4rs::init_config(config)?;
        return Ok(());
    }

    if !Path::new("logs").exists() {
        fs::create_dir("logs")?;
    }

    log4rs::init_file(path, Default::default())
        .map_err(|e| anyhow!("Could not initialize logging: {}", e))
}
