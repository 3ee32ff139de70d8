//! The application handle: every collection, the session and the settings.
//!
//! Services are `impl InvoiceFlow` blocks under `services/`. Each one checks
//! authorization against the session user before touching a repository.

use std::sync::Arc;

use invoiceflow_ai::TextGenerator;
use invoiceflow_auth::{AuthzError, Capability, PasswordHasher, Session, SessionChange, User, authorize};
use invoiceflow_inventory::{Brand, Category, Product};
use invoiceflow_invoicing::Invoice;
use invoiceflow_purchasing::{PurchaseOrder, SalesReturn};

use crate::config::Config;
use crate::error::{ServiceResult, StoreError};
use crate::repository::{Repository, SnapshotRepository};
use crate::seed;
use crate::store::{JsonDirStore, KeyValueStore, keys};

pub struct InvoiceFlow {
    store: Arc<dyn KeyValueStore>,
    pub(crate) hasher: PasswordHasher,
    pub(crate) low_stock_threshold: i64,
    pub(crate) session: Session,
    pub(crate) users: Box<dyn Repository<User>>,
    pub(crate) products: Box<dyn Repository<Product>>,
    pub(crate) categories: Box<dyn Repository<Category>>,
    pub(crate) brands: Box<dyn Repository<Brand>>,
    pub(crate) invoices: Box<dyn Repository<Invoice>>,
    pub(crate) purchase_orders: Box<dyn Repository<PurchaseOrder>>,
    pub(crate) returns: Box<dyn Repository<SalesReturn>>,
    pub(crate) generator: Option<Box<dyn TextGenerator>>,
}

impl std::fmt::Debug for InvoiceFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvoiceFlow")
            .field("session", &self.session.user().map(|u| &u.username))
            .field("users", &self.users.list().len())
            .field("products", &self.products.list().len())
            .field("invoices", &self.invoices.list().len())
            .field("generator", &self.generator.is_some())
            .finish()
    }
}

impl InvoiceFlow {
    /// Open the JSON directory named by `config.data_dir`.
    pub fn open_dir(config: &Config) -> ServiceResult<Self> {
        let store = JsonDirStore::open(&config.data_dir)?;
        Self::open(Arc::new(store), config)
    }

    /// Load every collection from `store`, seeding what is missing, then
    /// restore and refresh the persisted session.
    pub fn open(store: Arc<dyn KeyValueStore>, config: &Config) -> ServiceResult<Self> {
        let hasher = PasswordHasher::new(config.bcrypt_cost);

        let users = SnapshotRepository::open(store.clone(), keys::USERS, || seed::users(&hasher))?;
        let products =
            SnapshotRepository::open(store.clone(), keys::PRODUCTS, || Ok(seed::products()))?;
        let categories =
            SnapshotRepository::open(store.clone(), keys::CATEGORIES, || Ok(seed::categories()))?;
        let brands = SnapshotRepository::open(store.clone(), keys::BRANDS, || Ok(seed::brands()))?;
        let invoices = SnapshotRepository::open(store.clone(), keys::INVOICES, || Ok(Vec::new()))?;
        let purchase_orders =
            SnapshotRepository::open(store.clone(), keys::PURCHASE_ORDERS, || Ok(Vec::new()))?;
        let returns = SnapshotRepository::open(store.clone(), keys::RETURNS, || Ok(Vec::new()))?;

        let session = Session::new(load_session(store.as_ref())?);

        let mut app = Self {
            store,
            hasher,
            low_stock_threshold: config.low_stock_threshold,
            session,
            users: Box::new(users),
            products: Box::new(products),
            categories: Box::new(categories),
            brands: Box::new(brands),
            invoices: Box::new(invoices),
            purchase_orders: Box::new(purchase_orders),
            returns: Box::new(returns),
            generator: None,
        };
        app.sync_session()?;
        Ok(app)
    }

    /// Attach a text generator for descriptions and insights.
    pub fn with_generator(mut self, generator: Box<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.user()
    }

    pub fn low_stock_threshold(&self) -> i64 {
        self.low_stock_threshold
    }

    /// Gate on `capability` for the session user. Denials are logged.
    pub(crate) fn require(&self, capability: Capability) -> ServiceResult<()> {
        authorize(self.session.user(), capability).map_err(|err| {
            self.log_denied(&err);
            err.into()
        })
    }

    /// Any logged-in, active user.
    pub(crate) fn require_active(&self) -> ServiceResult<&User> {
        let user = self.session.user().ok_or(AuthzError::Unauthenticated)?;
        if !user.is_active {
            self.log_denied(&AuthzError::Inactive);
            return Err(AuthzError::Inactive.into());
        }
        Ok(user)
    }

    pub(crate) fn log_denied(&self, err: &AuthzError) {
        tracing::warn!(
            user = self.session.user().map(|u| u.username.as_str()).unwrap_or("-"),
            error = %err,
            redirect = ?err.redirect(),
            "action denied"
        );
    }

    /// Reconcile the session with the canonical user list and persist it.
    ///
    /// Runs after every user mutation so a revoked flag or a deactivation
    /// applies to the very next check.
    pub(crate) fn sync_session(&mut self) -> ServiceResult<SessionChange> {
        let change = self.session.refresh(self.users.list());
        match change {
            SessionChange::Unchanged => {}
            SessionChange::Refreshed => {
                tracing::info!("session refreshed from user record");
                self.persist_session()?;
            }
            SessionChange::LoggedOut => {
                tracing::info!("session user no longer exists; logged out");
                self.persist_session()?;
            }
        }
        Ok(change)
    }

    pub(crate) fn persist_session(&self) -> ServiceResult<()> {
        match self.session.user() {
            Some(user) => {
                let raw = serde_json::to_string(user).map_err(|source| StoreError::Encode {
                    key: keys::CURRENT_SESSION.to_string(),
                    source,
                })?;
                self.store.set(keys::CURRENT_SESSION, &raw)?;
            }
            None => self.store.remove(keys::CURRENT_SESSION)?,
        }
        Ok(())
    }
}

fn load_session(store: &dyn KeyValueStore) -> ServiceResult<Option<User>> {
    let Some(raw) = store.get(keys::CURRENT_SESSION)? else {
        return Ok(None);
    };
    match serde_json::from_str::<User>(&raw) {
        Ok(user) => Ok(Some(user)),
        Err(err) => {
            tracing::warn!(error = %err, "stored session unreadable; starting logged out");
            Ok(None)
        }
    }
}
