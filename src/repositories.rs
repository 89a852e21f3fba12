pub mod ads;
pub mod api;
pub mod approvals;
pub mod auth;
pub mod commissions;
pub mod daily_bonus;
pub mod dashboard;
pub mod deposits;
pub mod notices;
pub mod notifications;
pub mod taxonomy;
pub mod token_store;
pub mod transfers;
pub mod upload;
pub mod users;
pub mod wallet;
pub mod withdrawals;

pub use api::{ApiClient, ApiError};
pub use token_store::TokenStore;

use crate::settings::Settings;

/// Every resource repository, sharing one client and one token store.
#[derive(Clone, Debug)]
pub struct Repositories {
    pub api: ApiClient,
    pub auth: auth::AuthRepository,
    pub approvals: approvals::ApprovalRepository,
    pub ads: ads::AdRepository,
    pub categories: taxonomy::CategoryRepository,
    pub locations: taxonomy::LocationRepository,
    pub commissions: commissions::CommissionRepository,
    pub daily_bonus: daily_bonus::DailyBonusRepository,
    pub dashboard: dashboard::DashboardRepository,
    pub deposits: deposits::DepositRepository,
    pub notices: notices::NoticeRepository,
    pub notifications: notifications::NotificationRepository,
    pub transfers: transfers::TransferRepository,
    pub upload: upload::UploadRepository,
    pub users: users::UserRepository,
    pub wallet: wallet::WalletRepository,
    pub withdrawals: withdrawals::WithdrawalRepository,
}

impl Repositories {
    pub fn new(settings: &Settings, tokens: TokenStore) -> Result<Self, ApiError> {
        let api = ApiClient::new(settings, tokens)?;

        Ok(Self {
            auth: auth::AuthRepository::new(api.clone()),
            approvals: approvals::ApprovalRepository::new(api.clone()),
            ads: ads::AdRepository::new(api.clone()),
            categories: taxonomy::CategoryRepository::new(api.clone()),
            locations: taxonomy::LocationRepository::new(api.clone()),
            commissions: commissions::CommissionRepository::new(api.clone()),
            daily_bonus: daily_bonus::DailyBonusRepository::new(api.clone()),
            dashboard: dashboard::DashboardRepository::new(api.clone()),
            deposits: deposits::DepositRepository::new(
                api.clone(),
                settings.deposits.batch_size,
                settings.deposits.max_pages,
            ),
            notices: notices::NoticeRepository::new(api.clone()),
            notifications: notifications::NotificationRepository::new(api.clone()),
            transfers: transfers::TransferRepository::new(api.clone()),
            upload: upload::UploadRepository::new(api.clone()),
            users: users::UserRepository::new(api.clone()),
            wallet: wallet::WalletRepository::new(api.clone()),
            withdrawals: withdrawals::WithdrawalRepository::new(api.clone()),
            api,
        })
    }

    pub fn tokens(&self) -> &TokenStore {
        self.api.tokens()
    }
}
