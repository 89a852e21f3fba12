use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::{mpsc, oneshot, Mutex};

use super::auth::AuthGate;
use super::{RequestHandler, Service, ServiceError};
use crate::repositories::{ApiError, Repositories};
use crate::views::account_requests::AccountRequestsView;
use crate::views::ads::AdsView;
use crate::views::bonus::BonusView;
use crate::views::dashboard::DashboardView;
use crate::views::deposits::DepositsView;
use crate::views::leaderboard::LeaderboardView;
use crate::views::notices::NoticesView;
use crate::views::reward_income::RewardIncomeView;
use crate::views::users::UsersView;
use crate::views::withdrawals::WithdrawalsView;
use crate::views::{Screen, StatusFilter};

/// Sidebar entries, in display order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tab {
    #[default]
    Dashboard,
    AccountRequests,
    WithdrawalRequests,
    Deposits,
    ManageUsers,
    RewardIncome,
    Leaderboard,
    AdsManager,
    Notice,
    Bonus,
}

impl Tab {
    pub const ALL: [Tab; 10] = [
        Tab::Dashboard,
        Tab::AccountRequests,
        Tab::WithdrawalRequests,
        Tab::Deposits,
        Tab::ManageUsers,
        Tab::RewardIncome,
        Tab::Leaderboard,
        Tab::AdsManager,
        Tab::Notice,
        Tab::Bonus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Dashboard => "dashboard",
            Tab::AccountRequests => "account-requests",
            Tab::WithdrawalRequests => "withdrawal-requests",
            Tab::Deposits => "deposits",
            Tab::ManageUsers => "manage-users",
            Tab::RewardIncome => "reward-income",
            Tab::Leaderboard => "leaderboard",
            Tab::AdsManager => "ads-manager",
            Tab::Notice => "notice",
            Tab::Bonus => "bonus",
        }
    }

    /// Unknown names fall back to the dashboard.
    pub fn from_name(name: &str) -> Self {
        Tab::ALL
            .into_iter()
            .find(|tab| tab.as_str() == name.trim())
            .unwrap_or_default()
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Tab(Tab),
    Search(String),
    Status(StatusFilter),
    Page(usize),
    Refresh,
    Approve(String),
    Reject { id: String, reason: Option<String> },
    Sent(String),
    Delete(String),
    Feature(String),
    Show(String),
    Toggle(String),
    Award,
    WhoAmI,
    Logout,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = ServiceError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let id = || -> Result<String, ServiceError> {
            rest.split_whitespace()
                .next()
                .map(str::to_string)
                .ok_or_else(|| ServiceError::InvalidCommand(format!("`{word}` needs an id")))
        };

        let command = match word {
            "tab" => Command::Tab(Tab::from_name(rest)),
            "search" => Command::Search(rest.to_string()),
            "status" => Command::Status(StatusFilter::parse(rest)),
            "page" => Command::Page(
                rest.parse()
                    .map_err(|_| ServiceError::InvalidCommand(format!("bad page number `{rest}`")))?,
            ),
            "refresh" => Command::Refresh,
            "approve" => Command::Approve(id()?),
            "reject" => {
                let id = id()?;
                let reason = rest
                    .split_once(char::is_whitespace)
                    .map(|(_, reason)| reason.trim().to_string())
                    .filter(|reason| !reason.is_empty());
                Command::Reject { id, reason }
            }
            "sent" => Command::Sent(id()?),
            "delete" => Command::Delete(id()?),
            "feature" => Command::Feature(id()?),
            "show" => Command::Show(id()?),
            "toggle" => Command::Toggle(id()?),
            "award" => Command::Award,
            "whoami" => Command::WhoAmI,
            "logout" => Command::Logout,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(ServiceError::InvalidCommand(format!("unknown command `{other}`"))),
        };

        Ok(command)
    }
}

pub const HELP: &str = "\
Commands:
  tab <name>            switch screen (dashboard, account-requests, withdrawal-requests,
                        deposits, manage-users, reward-income, leaderboard, ads-manager,
                        notice, bonus)
  search <text>         filter rows by name/email/title
  status <filter>       filter by status (`all` clears)
  page <n>              jump to a page (deposits)
  refresh               reload the current screen
  approve <id>          approve an account, withdrawal or deposit
  reject <id> [reason]  reject an account, withdrawal or deposit
  sent <id>             mark a withdrawal as sent
  show <id>             open deposit or user details, or a user's commissions
  toggle <id>           toggle an ad or notice
  feature <id>          feature an ad
  delete <id>           delete an ad, notice or user
  award                 run the daily bonus check
  whoami | logout | help | quit";

/// Every screen, built once and kept for the whole session.
pub struct Screens {
    pub dashboard: DashboardView,
    pub account_requests: AccountRequestsView,
    pub withdrawals: WithdrawalsView,
    pub deposits: DepositsView,
    pub users: UsersView,
    pub reward_income: RewardIncomeView,
    pub leaderboard: LeaderboardView,
    pub ads: AdsView,
    pub notices: NoticesView,
    pub bonus: BonusView,
}

impl Screens {
    pub fn new(repos: &Repositories, deposit_page_size: usize) -> Self {
        Self {
            dashboard: DashboardView::new(
                repos.dashboard.clone(),
                repos.transfers.clone(),
                repos.notifications.clone(),
            ),
            account_requests: AccountRequestsView::new(repos.approvals.clone()),
            withdrawals: WithdrawalsView::new(repos.withdrawals.clone()),
            deposits: DepositsView::new(repos.deposits.clone(), deposit_page_size),
            users: UsersView::new(repos.users.clone()),
            reward_income: RewardIncomeView::new(repos.commissions.clone()),
            leaderboard: LeaderboardView::new(repos.commissions.clone()),
            ads: AdsView::new(
                repos.ads.clone(),
                repos.categories.clone(),
                repos.locations.clone(),
            ),
            notices: NoticesView::new(repos.notices.clone()),
            bonus: BonusView::new(repos.daily_bonus.clone()),
        }
    }

    pub fn screen(&self, tab: Tab) -> &dyn Screen {
        match tab {
            Tab::Dashboard => &self.dashboard,
            Tab::AccountRequests => &self.account_requests,
            Tab::WithdrawalRequests => &self.withdrawals,
            Tab::Deposits => &self.deposits,
            Tab::ManageUsers => &self.users,
            Tab::RewardIncome => &self.reward_income,
            Tab::Leaderboard => &self.leaderboard,
            Tab::AdsManager => &self.ads,
            Tab::Notice => &self.notices,
            Tab::Bonus => &self.bonus,
        }
    }

    pub fn screen_mut(&mut self, tab: Tab) -> &mut dyn Screen {
        match tab {
            Tab::Dashboard => &mut self.dashboard,
            Tab::AccountRequests => &mut self.account_requests,
            Tab::WithdrawalRequests => &mut self.withdrawals,
            Tab::Deposits => &mut self.deposits,
            Tab::ManageUsers => &mut self.users,
            Tab::RewardIncome => &mut self.reward_income,
            Tab::Leaderboard => &mut self.leaderboard,
            Tab::AdsManager => &mut self.ads,
            Tab::Notice => &mut self.notices,
            Tab::Bonus => &mut self.bonus,
        }
    }

    /// Runs an action command against the screen that owns it.
    pub async fn act(&mut self, tab: Tab, command: &Command) -> Result<(), ServiceError> {
        let unsupported = || {
            ServiceError::InvalidCommand(format!("not available on the {tab} screen"))
        };

        let result: Result<(), ApiError> = match (tab, command) {
            (Tab::AccountRequests, Command::Approve(id)) => self.account_requests.approve(id).await,
            (Tab::AccountRequests, Command::Reject { id, .. }) => self.account_requests.reject(id).await,
            (Tab::WithdrawalRequests, Command::Approve(id)) => self.withdrawals.approve(id).await,
            (Tab::WithdrawalRequests, Command::Reject { id, reason }) => {
                self.withdrawals.reject(id, reason.as_deref()).await
            }
            (Tab::WithdrawalRequests, Command::Sent(id)) => self.withdrawals.mark_sent(id).await,
            (Tab::Deposits, Command::Approve(id)) => self.deposits.approve(id).await,
            (Tab::Deposits, Command::Reject { id, reason }) => {
                self.deposits.reject(id, reason.as_deref()).await
            }
            (Tab::Deposits, Command::Show(id)) => self.deposits.show(id).await,
            (Tab::ManageUsers, Command::Show(id)) => self.users.show(id).await,
            (Tab::RewardIncome, Command::Show(id)) => self.reward_income.show_user(id).await,
            (Tab::AdsManager, Command::Toggle(id)) => self.ads.toggle_status(id).await,
            (Tab::AdsManager, Command::Feature(id)) => self.ads.feature(id).await,
            (Tab::AdsManager, Command::Delete(id)) => self.ads.delete(id).await,
            (Tab::Notice, Command::Toggle(id)) => self.notices.toggle_active(id).await,
            (Tab::Notice, Command::Delete(id)) => self.notices.delete(id).await,
            (Tab::ManageUsers, Command::Delete(id)) => self.users.delete(id).await,
            (Tab::Bonus, Command::Award) => self.bonus.check_and_award().await,
            _ => return Err(unsupported()),
        };

        result.map_err(ServiceError::from)
    }
}

pub struct ConsoleState {
    pub gate: AuthGate,
    pub tab: Tab,
    pub screens: Screens,
}

/// Output of one console command.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConsoleReply {
    pub output: String,
    pub quit: bool,
}

impl ConsoleReply {
    fn text(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            quit: false,
        }
    }
}

pub enum ConsoleRequest {
    Execute {
        line: String,
        response: oneshot::Sender<Result<ConsoleReply, ServiceError>>,
    },
}

#[derive(Clone)]
pub struct ConsoleRequestHandler {
    state: Arc<Mutex<ConsoleState>>,
}

impl ConsoleRequestHandler {
    pub fn new(repos: &Repositories, deposit_page_size: usize) -> Self {
        let state = ConsoleState {
            gate: AuthGate::new(repos.auth.clone(), repos.tokens().clone()),
            tab: Tab::Dashboard,
            screens: Screens::new(repos, deposit_page_size),
        };

        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub async fn execute(&self, line: &str) -> Result<ConsoleReply, ServiceError> {
        let command: Command = line.parse()?;
        let mut state = self.state.lock().await;

        match command {
            Command::Help => return Ok(ConsoleReply::text(HELP)),
            Command::Quit => {
                return Ok(ConsoleReply {
                    output: String::new(),
                    quit: true,
                })
            }
            _ => {}
        }

        Self::ensure_session(&mut state).await?;
        let ConsoleState { gate, tab, screens } = &mut *state;

        match command {
            Command::WhoAmI => {
                let identity = gate.identity().cloned().unwrap_or_default();
                Ok(ConsoleReply::text(format!(
                    "{} <{}> role={}",
                    identity.name.as_deref().unwrap_or("admin"),
                    identity.email.as_deref().unwrap_or(""),
                    identity.role.as_deref().unwrap_or("")
                )))
            }
            Command::Logout => {
                gate.logout().await?;
                *tab = Tab::Dashboard;
                Ok(ConsoleReply::text("Signed out."))
            }
            Command::Tab(next) => {
                *tab = next;
                let screen = screens.screen_mut(next);
                screen.refresh().await;
                Ok(Self::render(screens, next))
            }
            Command::Search(text) => {
                screens.screen_mut(*tab).set_search(&text);
                Ok(Self::render(screens, *tab))
            }
            Command::Status(filter) => {
                screens.screen_mut(*tab).set_status(filter);
                Ok(Self::render(screens, *tab))
            }
            Command::Page(page) => {
                screens.screen_mut(*tab).set_page(page);
                Ok(Self::render(screens, *tab))
            }
            Command::Refresh => {
                screens.screen_mut(*tab).refresh().await;
                Ok(Self::render(screens, *tab))
            }
            action => {
                let outcome = screens.act(*tab, &action).await;
                match outcome {
                    Ok(()) => Ok(Self::render(screens, *tab)),
                    Err(ServiceError::Api(e)) if !e.is_unauthorized() => {
                        Ok(Self::render(screens, *tab))
                    }
                    Err(e) => Err(e),
                }
            }
        }
    }

    /// Re-verifies the session when it is unknown or the token was dropped.
    async fn ensure_session(state: &mut ConsoleState) -> Result<(), ServiceError> {
        let has_token = state.gate.has_stored_token().await;
        if !state.gate.is_authenticated() || !has_token {
            state.gate.check().await;
        }

        if state.gate.is_authenticated() {
            Ok(())
        } else {
            state.tab = Tab::Dashboard;
            Err(ServiceError::Unauthenticated)
        }
    }

    fn render(screens: &Screens, tab: Tab) -> ConsoleReply {
        let screen = screens.screen(tab);
        ConsoleReply::text(format!("== {} ==\n{}", screen.title(), screen.render()))
    }
}

#[async_trait]
impl RequestHandler<ConsoleRequest> for ConsoleRequestHandler {
    async fn handle_request(&self, request: ConsoleRequest) {
        match request {
            ConsoleRequest::Execute { line, response } => {
                let reply = self.execute(&line).await;
                let _ = response.send(reply);
            }
        }
    }
}

pub struct ConsoleService;

impl ConsoleService {
    pub fn new() -> Self {
        ConsoleService
    }
}

impl Default for ConsoleService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<ConsoleRequest, ConsoleRequestHandler> for ConsoleService {}

/// Sends one line to the console service and waits for its reply.
pub async fn execute(
    console_tx: &mpsc::Sender<ConsoleRequest>,
    line: String,
) -> Result<ConsoleReply, ServiceError> {
    let (response_tx, response_rx) = oneshot::channel();
    console_tx
        .send(ConsoleRequest::Execute {
            line,
            response: response_tx,
        })
        .await
        .map_err(|e| ServiceError::Communication("console".to_string(), e.to_string()))?;

    response_rx
        .await
        .map_err(|e| ServiceError::Communication("console".to_string(), e.to_string()))?
}

/// Interactive loop over stdin. Returns when the user quits or input ends.
pub async fn run_console(repos: &Repositories, deposit_page_size: usize) -> Result<(), ServiceError> {
    let (console_tx, mut console_rx) = mpsc::channel(32);
    let handler = ConsoleRequestHandler::new(repos, deposit_page_size);

    log::info!("Starting console service.");
    tokio::spawn(async move {
        let mut service = ConsoleService::new();
        service.run(handler, &mut console_rx).await;
    });

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    write_out(&mut stdout, "PakAds admin console. Type `help` for commands.\n").await;

    let first = execute(&console_tx, "tab dashboard".to_string()).await;
    print_reply(&mut stdout, first).await;

    loop {
        write_out(&mut stdout, "pakads> ").await;
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                log::warn!("Failed to read console input: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let reply = execute(&console_tx, line).await;
        if matches!(&reply, Ok(r) if r.quit) {
            break;
        }
        print_reply(&mut stdout, reply).await;
    }

    Ok(())
}

async fn print_reply(stdout: &mut tokio::io::Stdout, reply: Result<ConsoleReply, ServiceError>) {
    match reply {
        Ok(reply) => write_out(stdout, &format!("{}\n", reply.output)).await,
        Err(e) => write_out(stdout, &format!("error: {}\n", e)).await,
    }
}

async fn write_out(stdout: &mut tokio::io::Stdout, text: &str) {
    if let Err(e) = stdout.write_all(text.as_bytes()).await {
        log::warn!("Failed to write to stdout: {}", e);
    }
    let _ = stdout.flush().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tabs_fall_back_to_dashboard() {
        assert_eq!(Tab::from_name("deposits"), Tab::Deposits);
        assert_eq!(Tab::from_name("ads-manager"), Tab::AdsManager);
        assert_eq!(Tab::from_name("settings"), Tab::Dashboard);
        assert_eq!(Tab::from_name(""), Tab::Dashboard);
    }

    #[test]
    fn tab_names_round_trip() {
        for tab in Tab::ALL {
            assert_eq!(Tab::from_name(tab.as_str()), tab);
        }
    }

    #[test]
    fn parses_reject_with_reason() {
        let command: Command = "reject 42 blurry proof".parse().expect("command");
        assert_eq!(
            command,
            Command::Reject {
                id: "42".into(),
                reason: Some("blurry proof".into())
            }
        );

        let command: Command = "reject 42".parse().expect("command");
        assert_eq!(command, Command::Reject { id: "42".into(), reason: None });
    }

    #[test]
    fn parses_filters_and_pages() {
        assert_eq!("status all".parse::<Command>().ok(), Some(Command::Status(StatusFilter::All)));
        assert_eq!(
            "status pending".parse::<Command>().ok(),
            Some(Command::Status(StatusFilter::Only("pending".into())))
        );
        assert_eq!("page 3".parse::<Command>().ok(), Some(Command::Page(3)));
        assert!("page x".parse::<Command>().is_err());
        assert!("approve".parse::<Command>().is_err());
        assert!("launch".parse::<Command>().is_err());
    }
}
