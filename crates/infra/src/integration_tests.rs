//! Service-level tests for the full pipeline.
//!
//! Tests: service call -> authorization -> domain rules -> repositories -> store
//!
//! Verifies:
//! - Invoice saves keep totals and stock consistent across every transition
//! - Failed checks write nothing
//! - Capability and rank rules gate every mutation
//! - Sessions follow changes to their own user record

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use invoiceflow_auth::{AuthzError, Capability, LoginError, NewUser, Permissions, Redirect, Role, User};
    use invoiceflow_core::{DomainError, InvoiceId, ProductId, ReturnId, UserId};
    use invoiceflow_invoicing::{InvoiceDraft, InvoiceLine, InvoiceStatus};
    use invoiceflow_purchasing::{
        PoLine, PurchaseOrderDraft, PurchaseOrderStatus, ReturnStatus, SalesReturn,
    };
    use proptest::prelude::*;

    use crate::store::keys;
    use crate::{Config, InMemoryStore, InvoiceFlow, JsonDirStore, KeyValueStore, ServiceError};

    const MOUSE: &str = "1";
    const KEYBOARD: &str = "2";
    const MONITOR: &str = "3";

    fn config() -> Config {
        Config {
            bcrypt_cost: 4,
            ..Config::default()
        }
    }

    fn open(store: &Arc<InMemoryStore>) -> InvoiceFlow {
        InvoiceFlow::open(store.clone(), &config()).unwrap()
    }

    fn as_admin() -> (Arc<InMemoryStore>, InvoiceFlow) {
        let store = Arc::new(InMemoryStore::new());
        let mut app = open(&store);
        app.login("admin", "password").unwrap();
        (store, app)
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn line(product: &str, quantity: i64, price: u64) -> InvoiceLine {
        InvoiceLine {
            product_id: ProductId::from(product),
            product_name: format!("product {product}"),
            quantity,
            price,
        }
    }

    fn draft(lines: Vec<InvoiceLine>) -> InvoiceDraft {
        InvoiceDraft::new("Acme Corp", day(), lines)
    }

    fn stock(app: &InvoiceFlow, id: &str) -> i64 {
        app.get_product(&ProductId::from(id)).unwrap().stock
    }

    fn set_stock(app: &mut InvoiceFlow, id: &str, value: i64) {
        let mut product = app.get_product(&ProductId::from(id)).unwrap().clone();
        product.stock = value;
        app.update_product(product).unwrap();
    }

    fn add_user(app: &mut InvoiceFlow, name: &str, role: Role, permissions: Permissions) -> User {
        app.add_member(NewUser::new(name, "secret", role).with_permissions(permissions))
            .unwrap()
            .unwrap()
    }

    fn switch_to(app: &mut InvoiceFlow, name: &str, password: &str) {
        app.logout().unwrap();
        app.login(name, password).unwrap();
    }

    fn authz(err: ServiceError) -> AuthzError {
        err.as_authz().cloned().unwrap_or_else(|| panic!("expected authz error, got {err:?}"))
    }

    fn domain(err: ServiceError) -> DomainError {
        err.as_domain().cloned().unwrap_or_else(|| panic!("expected domain error, got {err:?}"))
    }

    // ---- invoices ---------------------------------------------------------

    #[test]
    fn total_is_recomputed_on_every_save() {
        let (_store, mut app) = as_admin();
        let inv = app
            .create_invoice(draft(vec![line(MOUSE, 2, 2999), line(KEYBOARD, 1, 8999)]), InvoiceStatus::Draft)
            .unwrap();
        assert_eq!(inv.total, 2 * 2999 + 8999);

        let updated = app
            .update_invoice(&inv.id, draft(vec![line(MOUSE, 3, 2999)]), InvoiceStatus::Draft)
            .unwrap();
        assert_eq!(updated.total, 3 * 2999);
        assert_eq!(app.get_invoice(&inv.id).unwrap().total, 3 * 2999);
    }

    #[test]
    fn paid_create_deducts_and_draft_create_does_not() {
        let (_store, mut app) = as_admin();
        app.create_invoice(draft(vec![line(MOUSE, 5, 2999)]), InvoiceStatus::Draft)
            .unwrap();
        assert_eq!(stock(&app, MOUSE), 50);

        app.create_invoice(draft(vec![line(MOUSE, 5, 2999)]), InvoiceStatus::Paid)
            .unwrap();
        assert_eq!(stock(&app, MOUSE), 45);
    }

    #[test]
    fn deleting_restores_only_what_a_paid_invoice_held() {
        let (_store, mut app) = as_admin();
        let paid = app
            .create_invoice(draft(vec![line(MOUSE, 4, 2999), line(KEYBOARD, 2, 8999)]), InvoiceStatus::Paid)
            .unwrap();
        let cancelled = app
            .create_invoice(draft(vec![line(MOUSE, 9, 2999)]), InvoiceStatus::Cancelled)
            .unwrap();
        assert_eq!((stock(&app, MOUSE), stock(&app, KEYBOARD)), (46, 13));

        app.delete_invoice(&cancelled.id).unwrap();
        assert_eq!((stock(&app, MOUSE), stock(&app, KEYBOARD)), (46, 13));

        app.delete_invoice(&paid.id).unwrap();
        assert_eq!((stock(&app, MOUSE), stock(&app, KEYBOARD)), (50, 15));
        assert!(app.list_invoices().unwrap().is_empty());
    }

    #[test]
    fn monitor_stock_runs_out_at_exactly_eight() {
        let (_store, mut app) = as_admin();
        assert_eq!(stock(&app, MONITOR), 8);

        app.create_invoice(draft(vec![line(MONITOR, 8, 34999)]), InvoiceStatus::Paid)
            .unwrap();
        assert_eq!(stock(&app, MONITOR), 0);

        let before = app.list_invoices().unwrap().len();
        let err = domain(
            app.create_invoice(draft(vec![line(MONITOR, 1, 34999)]), InvoiceStatus::Paid)
                .unwrap_err(),
        );
        let lines = err.shortfalls();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].line, 0);
        assert_eq!(lines[0].product_id, ProductId::from(MONITOR));
        assert_eq!(lines[0].max_available(), Some(0));

        assert_eq!(stock(&app, MONITOR), 0);
        assert_eq!(app.list_invoices().unwrap().len(), before);
    }

    #[test]
    fn paid_edit_down_from_negative_live_stock() {
        let (_store, mut app) = as_admin();
        let inv = app
            .create_invoice(draft(vec![line(MONITOR, 5, 34999)]), InvoiceStatus::Paid)
            .unwrap();
        set_stock(&mut app, MONITOR, -2);

        app.update_invoice(&inv.id, draft(vec![line(MONITOR, 2, 34999)]), InvoiceStatus::Paid)
            .unwrap();
        assert_eq!(stock(&app, MONITOR), 1);
    }

    #[test]
    fn status_transitions_move_stock_per_matrix() {
        let (_store, mut app) = as_admin();
        let inv = app
            .create_invoice(draft(vec![line(KEYBOARD, 3, 8999)]), InvoiceStatus::Draft)
            .unwrap();

        app.set_invoice_status(&inv.id, InvoiceStatus::Paid).unwrap();
        assert_eq!(stock(&app, KEYBOARD), 12);

        app.set_invoice_status(&inv.id, InvoiceStatus::Paid).unwrap();
        assert_eq!(stock(&app, KEYBOARD), 12);

        app.set_invoice_status(&inv.id, InvoiceStatus::Cancelled).unwrap();
        assert_eq!(stock(&app, KEYBOARD), 15);

        app.set_invoice_status(&inv.id, InvoiceStatus::Draft).unwrap();
        assert_eq!(stock(&app, KEYBOARD), 15);
    }

    #[test]
    fn draft_to_paid_gets_no_credit_for_the_draft() {
        let (_store, mut app) = as_admin();
        let inv = app
            .create_invoice(draft(vec![line(MONITOR, 9, 34999)]), InvoiceStatus::Draft)
            .unwrap();
        let err = domain(app.set_invoice_status(&inv.id, InvoiceStatus::Paid).unwrap_err());
        assert_eq!(err.shortfalls()[0].max_available(), Some(8));
        assert_eq!(app.get_invoice(&inv.id).unwrap().status, InvoiceStatus::Draft);
    }

    #[test]
    fn update_keeps_author_and_unknown_ids_are_not_found() {
        let (_store, mut app) = as_admin();
        let inv = app
            .create_invoice(draft(vec![line(MOUSE, 1, 2999)]), InvoiceStatus::Draft)
            .unwrap();
        assert_eq!(inv.created_by, UserId::from("1"));

        add_user(&mut app, "clerk", Role::Member, Permissions::MEMBER_DEFAULT);
        switch_to(&mut app, "clerk", "secret");
        let updated = app
            .update_invoice(&inv.id, draft(vec![line(MOUSE, 2, 2999)]), InvoiceStatus::Draft)
            .unwrap();
        assert_eq!(updated.created_by, UserId::from("1"));

        let ghost = InvoiceId::from("ghost");
        assert!(matches!(
            domain(app.delete_invoice(&ghost).unwrap_err()),
            DomainError::NotFound(_)
        ));
        assert!(matches!(
            domain(app.update_invoice(&ghost, draft(vec![line(MOUSE, 1, 1)]), InvoiceStatus::Draft).unwrap_err()),
            DomainError::NotFound(_)
        ));
    }

    #[test]
    fn duplicate_invoice_id_conflicts() {
        let (_store, mut app) = as_admin();
        let id = InvoiceId::from("INV-1");
        app.create_invoice_with_id(id.clone(), draft(vec![line(MOUSE, 1, 2999)]), InvoiceStatus::Paid)
            .unwrap();
        let err = domain(
            app.create_invoice_with_id(id, draft(vec![line(MOUSE, 1, 2999)]), InvoiceStatus::Paid)
                .unwrap_err(),
        );
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(stock(&app, MOUSE), 49);
    }

    #[test]
    fn invoice_lines_snapshot_the_catalog() {
        let (_store, app) = as_admin();
        let snap = app.invoice_line(&ProductId::from(MONITOR), 2, None).unwrap();
        assert_eq!(snap.product_name, "USB-C Monitor");
        assert_eq!(snap.price, 34999);

        let discounted = app.invoice_line(&ProductId::from(MONITOR), 1, Some(30000)).unwrap();
        assert_eq!(discounted.price, 30000);

        assert!(matches!(
            domain(app.invoice_line(&ProductId::from("ghost"), 1, None).unwrap_err()),
            DomainError::NotFound(_)
        ));
    }

    #[test]
    fn missing_customer_writes_nothing() {
        let (_store, mut app) = as_admin();
        let mut bad = draft(vec![line(MOUSE, 1, 2999)]);
        bad.customer_name = "  ".to_string();
        assert!(matches!(
            domain(app.create_invoice(bad, InvoiceStatus::Paid).unwrap_err()),
            DomainError::Validation(_)
        ));
        assert!(app.list_invoices().unwrap().is_empty());
        assert_eq!(stock(&app, MOUSE), 50);
    }

    // ---- purchase orders ---------------------------------------------------

    #[test]
    fn failed_catalog_write_puts_the_invoice_back() {
        let (store, mut app) = as_admin();
        let paid = app
            .create_invoice(draft(vec![line(MOUSE, 4, 2999)]), InvoiceStatus::Paid)
            .unwrap();
        store.fail_writes(keys::PRODUCTS);

        let err = app
            .create_invoice(draft(vec![line(MOUSE, 1, 2999)]), InvoiceStatus::Paid)
            .unwrap_err();
        assert!(matches!(err, ServiceError::Store(_)));
        assert_eq!(app.list_invoices().unwrap().len(), 1);

        assert!(app.set_invoice_status(&paid.id, InvoiceStatus::Cancelled).is_err());
        assert_eq!(app.get_invoice(&paid.id).unwrap().status, InvoiceStatus::Paid);

        assert!(app.delete_invoice(&paid.id).is_err());
        assert!(app.get_invoice(&paid.id).is_ok());
        assert_eq!(stock(&app, MOUSE), 46);

        // The store agrees with memory after every rollback.
        let reopened = open(&store);
        let saved = reopened.invoices.list();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].status, InvoiceStatus::Paid);
    }

    #[test]
    fn failed_catalog_write_leaves_the_order_pending() {
        let (store, mut app) = as_admin();
        let po = app.create_purchase_order(po_draft()).unwrap();
        store.fail_writes(keys::PRODUCTS);

        assert!(app.approve_purchase_order(&po.id).is_err());
        assert_eq!(
            app.list_purchase_orders().unwrap()[0].status,
            PurchaseOrderStatus::Pending
        );
        assert_eq!(stock(&app, MOUSE), 50);
    }

    fn po_draft() -> PurchaseOrderDraft {
        PurchaseOrderDraft::new(
            "Logitech Supply",
            day(),
            vec![
                PoLine {
                    product_name: "Wireless Mouse".to_string(),
                    quantity: 20,
                    cost: 1500,
                },
                PoLine {
                    product_name: "Not In Catalog".to_string(),
                    quantity: 3,
                    cost: 100,
                },
            ],
        )
    }

    #[test]
    fn approving_twice_credits_stock_once() {
        let (_store, mut app) = as_admin();
        let po = app.create_purchase_order(po_draft()).unwrap();
        assert_eq!(po.total_cost, 20 * 1500 + 3 * 100);

        let moved = app.approve_purchase_order(&po.id).unwrap();
        assert_eq!(moved.len(), 1);
        assert_eq!(stock(&app, MOUSE), 70);

        assert!(app.approve_purchase_order(&po.id).unwrap().is_empty());
        assert_eq!(stock(&app, MOUSE), 70);
        assert_eq!(
            app.list_purchase_orders().unwrap()[0].status,
            PurchaseOrderStatus::Approved
        );
    }

    #[test]
    fn rejected_orders_never_credit_stock() {
        let (_store, mut app) = as_admin();
        let po = app.create_purchase_order(po_draft()).unwrap();
        assert!(app.reject_purchase_order(&po.id).unwrap());
        assert!(app.approve_purchase_order(&po.id).unwrap().is_empty());
        assert!(!app.reject_purchase_order(&po.id).unwrap());
        assert_eq!(stock(&app, MOUSE), 50);
    }

    #[test]
    fn member_without_orders_cannot_approve_but_superadmin_can() {
        let (_store, mut app) = as_admin();
        let po = app.create_purchase_order(po_draft()).unwrap();
        add_user(&mut app, "clerk", Role::Member, Permissions::MEMBER_DEFAULT);

        switch_to(&mut app, "clerk", "secret");
        let err = authz(app.approve_purchase_order(&po.id).unwrap_err());
        assert_eq!(err, AuthzError::Forbidden(Capability::Orders));
        assert_eq!(err.redirect(), Redirect::Dashboard);

        switch_to(&mut app, "admin", "password");
        app.approve_purchase_order(&po.id).unwrap();
        assert_eq!(stock(&app, MOUSE), 70);
    }

    #[test]
    fn returns_are_passive() {
        let (_store, mut app) = as_admin();
        let inv = app
            .create_invoice(draft(vec![line(MOUSE, 2, 2999)]), InvoiceStatus::Paid)
            .unwrap();
        let rec = app
            .add_return(SalesReturn {
                id: ReturnId::from(""),
                invoice_id: inv.id.clone(),
                reason: "Damaged in transit".to_string(),
                date: day(),
                status: ReturnStatus::Pending,
                refund_amount: 2999,
            })
            .unwrap();
        assert!(!rec.id.is_blank());
        assert_eq!(app.list_returns().unwrap().len(), 1);
        assert_eq!(stock(&app, MOUSE), 48);
        assert_eq!(app.get_invoice(&inv.id).unwrap().status, InvoiceStatus::Paid);
    }

    // ---- team & session ------------------------------------------------------

    #[test]
    fn admin_without_team_cannot_toggle_and_with_team_only_members() {
        let (_store, mut app) = as_admin();
        let member = add_user(&mut app, "clerk", Role::Member, Permissions::MEMBER_DEFAULT);
        let other_admin = add_user(&mut app, "boss", Role::Admin, Permissions::FULL);
        add_user(
            &mut app,
            "lead",
            Role::Admin,
            Permissions::FULL.with(Capability::Team, false),
        );

        switch_to(&mut app, "lead", "secret");
        let err = authz(app.toggle_user_status(&member.id).unwrap_err());
        assert_eq!(err, AuthzError::Forbidden(Capability::Team));

        switch_to(&mut app, "admin", "password");
        let lead_id = app
            .list_users()
            .unwrap()
            .iter()
            .find(|u| u.username == "lead")
            .map(|u| u.id.clone())
            .unwrap();
        app.set_user_permission(&lead_id, Capability::Team, true).unwrap();

        switch_to(&mut app, "lead", "secret");
        let toggled = app.toggle_user_status(&member.id).unwrap();
        assert!(!toggled.is_active);

        assert!(matches!(
            authz(app.toggle_user_status(&other_admin.id).unwrap_err()),
            AuthzError::CannotManage { .. }
        ));
        assert!(matches!(
            authz(app.toggle_user_status(&UserId::from("1")).unwrap_err()),
            AuthzError::CannotManage { .. }
        ));
        assert!(matches!(
            authz(app.toggle_user_status(&lead_id).unwrap_err()),
            AuthzError::CannotManage { .. }
        ));
    }

    #[test]
    fn admins_add_members_only() {
        let (_store, mut app) = as_admin();
        add_user(&mut app, "boss", Role::Admin, Permissions::FULL);
        switch_to(&mut app, "boss", "secret");

        let err = authz(
            app.add_member(NewUser::new("peer", "x", Role::Admin))
                .unwrap_err(),
        );
        assert_eq!(err, AuthzError::Forbidden(Capability::Team));

        let member = app
            .add_member(NewUser::new("clerk", "x", Role::Member))
            .unwrap()
            .unwrap();
        assert_eq!(member.permissions, Permissions::MEMBER_DEFAULT);
    }

    #[test]
    fn register_defaults_and_duplicate_usernames() {
        let store = Arc::new(InMemoryStore::new());
        let mut app = open(&store);

        let admin = app
            .register(NewUser::new("ops", "pw", Role::Admin))
            .unwrap()
            .unwrap();
        assert_eq!(admin.permissions, Permissions::FULL);
        assert!(admin.is_active);

        assert!(app.register(NewUser::new("ops", "other", Role::Member)).unwrap().is_none());
        assert!(app.register(NewUser::new("admin", "x", Role::Member)).unwrap().is_none());
    }

    #[test]
    fn self_registered_admin_gets_member_flags_and_is_logged_in() {
        let (_store, mut app) = as_admin();
        let clerk = add_user(&mut app, "clerk", Role::Member, Permissions::MEMBER_DEFAULT);
        app.logout().unwrap();

        let ops = app.sign_up("ops", "pw", Role::Admin).unwrap().unwrap();
        assert_eq!(ops.role, Role::Admin);
        assert_eq!(ops.permissions, Permissions::MEMBER_DEFAULT);
        assert_eq!(app.whoami().map(|u| u.id.clone()), Some(ops.id.clone()));

        assert_eq!(authz(app.list_users().unwrap_err()), AuthzError::Forbidden(Capability::Team));
        assert_eq!(
            authz(app.toggle_user_status(&clerk.id).unwrap_err()),
            AuthzError::Forbidden(Capability::Team)
        );
        assert!(app.list_products().is_ok());

        assert!(app.sign_up("admin", "x", Role::Member).unwrap().is_none());
        assert_eq!(app.whoami().map(|u| u.username.as_str()), Some("ops"));
    }

    #[test]
    fn login_reports_inactive_separately_and_unauthenticated_goes_to_login() {
        let (_store, mut app) = as_admin();
        let clerk = add_user(&mut app, "clerk", Role::Member, Permissions::MEMBER_DEFAULT);
        app.toggle_user_status(&clerk.id).unwrap();
        app.logout().unwrap();

        assert!(matches!(
            app.login("clerk", "wrong").unwrap_err(),
            ServiceError::Login(LoginError::InvalidCredentials)
        ));
        assert!(matches!(
            app.login("clerk", "secret").unwrap_err(),
            ServiceError::Login(LoginError::AccountInactive)
        ));

        let err = authz(app.list_invoices().unwrap_err());
        assert_eq!(err.redirect(), Redirect::Login);
        assert_eq!(authz(app.dashboard().unwrap_err()), AuthzError::Unauthenticated);
    }

    #[test]
    fn billing_is_superadmin_only() {
        let (_store, mut app) = as_admin();
        let summary = app.billing_summary().unwrap();
        assert_eq!(summary.users, 1);
        assert_eq!(summary.products, 3);

        add_user(&mut app, "boss", Role::Admin, Permissions::FULL);
        switch_to(&mut app, "boss", "secret");
        assert_eq!(
            authz(app.billing_summary().unwrap_err()),
            AuthzError::SuperadminOnly(Capability::Billing)
        );
        assert!(app.dashboard().is_ok());
        assert!(app.financial_report().is_ok());
    }

    #[test]
    fn reopened_session_picks_up_external_deactivation() {
        let store = Arc::new(InMemoryStore::new());
        {
            let mut app = open(&store);
            app.login("admin", "password").unwrap();
            add_user(&mut app, "clerk", Role::Member, Permissions::MEMBER_DEFAULT);
            switch_to(&mut app, "clerk", "secret");
        }

        // Another process deactivates the clerk.
        let raw = store.get(keys::USERS).unwrap().unwrap();
        let mut users: Vec<User> = serde_json::from_str(&raw).unwrap();
        for u in users.iter_mut().filter(|u| u.username == "clerk") {
            u.is_active = false;
        }
        store.set(keys::USERS, &serde_json::to_string(&users).unwrap()).unwrap();

        let app = open(&store);
        assert_eq!(app.whoami().map(|u| u.username.as_str()), Some("clerk"));
        let err = authz(app.list_invoices().unwrap_err());
        assert_eq!(err, AuthzError::Inactive);
        assert_eq!(err.redirect(), Redirect::AccountInactive);
    }

    #[test]
    fn deleting_the_session_user_elsewhere_logs_out_on_open() {
        let store = Arc::new(InMemoryStore::new());
        {
            let mut app = open(&store);
            app.login("admin", "password").unwrap();
            add_user(&mut app, "clerk", Role::Member, Permissions::MEMBER_DEFAULT);
            switch_to(&mut app, "clerk", "secret");
        }
        let raw = store.get(keys::USERS).unwrap().unwrap();
        let mut users: Vec<User> = serde_json::from_str(&raw).unwrap();
        users.retain(|u| u.username != "clerk");
        store.set(keys::USERS, &serde_json::to_string(&users).unwrap()).unwrap();

        let app = open(&store);
        assert!(app.whoami().is_none());
        assert_eq!(store.get(keys::CURRENT_SESSION).unwrap(), None);
    }

    #[test]
    fn legacy_users_without_permissions_get_role_defaults() {
        let legacy = r#"[
            {"id":"1","username":"admin","password_hash":"","role":"superadmin"},
            {"id":"2","username":"old","password_hash":"","role":"member","permissions":{"orders":true}}
        ]"#;
        let store = Arc::new(InMemoryStore::new().with_entry(keys::USERS, legacy));
        let _app = open(&store);
        let users: Vec<User> = serde_json::from_str(&store.get(keys::USERS).unwrap().unwrap()).unwrap();
        assert!(users[0].is_active);
        assert_eq!(users[0].permissions, Permissions::FULL);
        assert!(users[1].permissions.orders);
        assert!(users[1].permissions.inventory);
        assert!(!users[1].permissions.team);
    }

    #[test]
    fn corrupt_collections_fall_back_to_seed() {
        let store = Arc::new(InMemoryStore::new().with_entry(keys::PRODUCTS, "not json"));
        let mut app = open(&store);
        app.login("admin", "password").unwrap();
        assert_eq!(app.list_products().unwrap().len(), 3);
    }

    #[test]
    fn data_survives_reopen_on_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config().with_data_dir(tmp.path());
        {
            let mut app = InvoiceFlow::open_dir(&cfg).unwrap();
            app.login("admin", "password").unwrap();
            app.create_invoice(draft(vec![line(MOUSE, 10, 2999)]), InvoiceStatus::Paid)
                .unwrap();
        }
        let store = JsonDirStore::open(tmp.path()).unwrap();
        assert!(store.get(keys::INVOICES).unwrap().is_some());

        let app = InvoiceFlow::open_dir(&cfg).unwrap();
        assert_eq!(app.whoami().map(|u| u.role), Some(Role::Superadmin));
        assert_eq!(stock(&app, MOUSE), 40);
        assert_eq!(app.list_invoices().unwrap().len(), 1);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        /// Property: a Paid -> Paid edit from q1 to q2 moves stock by q1 - q2
        /// and is refused exactly when q2 > stock + q1.
        #[test]
        fn paid_edit_is_net_quantity_difference(q1 in 1i64..=15, q2 in 1i64..=40) {
            let (_store, mut app) = as_admin();
            let inv = app
                .create_invoice(draft(vec![line(KEYBOARD, q1, 8999)]), InvoiceStatus::Paid)
                .unwrap();
            let live = stock(&app, KEYBOARD);

            let result = app.update_invoice(&inv.id, draft(vec![line(KEYBOARD, q2, 8999)]), InvoiceStatus::Paid);
            if q2 > live + q1 {
                prop_assert!(result.is_err());
                prop_assert_eq!(stock(&app, KEYBOARD), live);
            } else {
                prop_assert!(result.is_ok());
                prop_assert_eq!(stock(&app, KEYBOARD), live + q1 - q2);
            }
        }
    }
}
