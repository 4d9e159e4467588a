//! Shared in-memory mocks and fixtures for handler tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::foundation::{
    DomainError, ErrorCode, LicenseId, LicenseOptionId, Money, OrderId, Timestamp, TrackId, UserId,
};
use crate::domain::settlement::{License, Order, OrderStatus, Payment, PaymentInstrument};
use crate::ports::{
    CatalogReader, FileLinkProvider, GatewayError, GatewayPayment, LicenseListFilter,
    LicenseRepository, LicenseSummary, LinkError, OrderRepository, PaymentGateway,
    PaymentRepository, Track,
};

pub const TEST_SECRET: &str = "merchant_test_secret_12345";
pub const STORAGE_BASE_URL: &str = "https://storage.beatvault.test/";

// ============================================================
// Fixtures
// ============================================================

pub fn test_track() -> Track {
    Track {
        id: TrackId::new(),
        producer_id: UserId::new(),
        title: "Midnight Drive".to_string(),
        artwork_url: Some(format!("{}art/midnight-drive.png", STORAGE_BASE_URL)),
        preview_url: format!("{}audio/midnight-drive.mp3", STORAGE_BASE_URL),
        wav_url: Some(format!("{}audio/midnight-drive.wav", STORAGE_BASE_URL)),
        stems_url: Some(format!("{}audio/midnight-drive-stems.zip", STORAGE_BASE_URL)),
        is_deleted: false,
    }
}

pub fn test_option(name: &str, price: f64, currency: &str) -> crate::ports::LicenseOption {
    crate::ports::LicenseOption {
        id: LicenseOptionId::new(),
        name: name.to_string(),
        price,
        currency: currency.to_string(),
    }
}

pub fn pending_order() -> Order {
    Order::create_pending(
        OrderId::new(),
        UserId::new(),
        TrackId::new(),
        LicenseOptionId::new(),
        "Premium".to_string(),
        Money::from_minor_units(9900, "INR"),
        "order_gw_1".to_string(),
    )
}

pub fn owned_license(track_id: TrackId) -> License {
    License::issue(
        LicenseId::new(),
        OrderId::new(),
        UserId::new(),
        track_id,
        LicenseOptionId::new(),
        "Premium".to_string(),
        Money::from_minor_units(9900, "INR"),
    )
}

pub fn paid_gateway_payment(payment_id: &str, status: &str) -> GatewayPayment {
    GatewayPayment {
        id: payment_id.to_string(),
        order_id: Some("order_gw_1".to_string()),
        status: status.to_string(),
        amount: Money::from_minor_units(9900, "INR"),
        instrument: PaymentInstrument {
            method: Some("upi".to_string()),
            vpa: Some("buyer@bank".to_string()),
            ..Default::default()
        },
        error_code: None,
        error_description: None,
    }
}

fn db_error(message: &str) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, message)
}

fn page<T: Clone>(items: &[T], limit: i64, offset: i64) -> Vec<T> {
    items
        .iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .cloned()
        .collect()
}

// ============================================================
// MockOrderRepository
// ============================================================

#[derive(Default)]
pub struct MockOrderRepository {
    orders: Mutex<Vec<Order>>,
    created: Mutex<Vec<Order>>,
    track_producers: Mutex<HashMap<TrackId, UserId>>,
    fail_transitions: AtomicBool,
    lose_next_transition: AtomicBool,
}

impl MockOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_order(order: Order) -> Self {
        let repo = Self::new();
        repo.seed(order);
        repo
    }

    pub fn seed(&self, order: Order) {
        self.orders.lock().unwrap().push(order);
    }

    pub fn link_track_producer(&self, track_id: TrackId, producer_id: UserId) {
        self.track_producers
            .lock()
            .unwrap()
            .insert(track_id, producer_id);
    }

    pub fn created_orders(&self) -> Vec<Order> {
        self.created.lock().unwrap().clone()
    }

    pub fn status_of(&self, id: &OrderId) -> Option<OrderStatus> {
        self.orders
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.id == *id)
            .map(|o| o.status)
    }

    /// Every subsequent status transition fails with a storage error.
    pub fn fail_transitions(&self) {
        self.fail_transitions.store(true, Ordering::SeqCst);
    }

    /// The next status transition reports no row changed, as if a
    /// concurrent caller had won the move.
    pub fn lose_next_transition(&self) {
        self.lose_next_transition.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl OrderRepository for MockOrderRepository {
    async fn create(&self, order: &Order) -> Result<(), DomainError> {
        self.created.lock().unwrap().push(order.clone());
        self.orders.lock().unwrap().push(order.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, DomainError> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.id == *id)
            .cloned())
    }

    async fn transition_status(
        &self,
        id: &OrderId,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<bool, DomainError> {
        if self.fail_transitions.load(Ordering::SeqCst) {
            return Err(db_error("transition rejected"));
        }
        if self.lose_next_transition.swap(false, Ordering::SeqCst) {
            return Ok(false);
        }
        let mut orders = self.orders.lock().unwrap();
        match orders.iter_mut().find(|o| o.id == *id && o.status == from) {
            Some(order) => {
                order.status = to;
                order.updated_at = Timestamp::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_by_buyer(
        &self,
        buyer_id: &UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Order>, DomainError> {
        let matching: Vec<Order> = self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.buyer_id == *buyer_id)
            .cloned()
            .collect();
        Ok(page(&matching, limit, offset))
    }

    async fn find_by_producer(
        &self,
        producer_id: &UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Order>, DomainError> {
        let producers = self.track_producers.lock().unwrap();
        let matching: Vec<Order> = self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| producers.get(&o.track_id) == Some(producer_id))
            .cloned()
            .collect();
        Ok(page(&matching, limit, offset))
    }
}

// ============================================================
// MockPaymentRepository
// ============================================================

#[derive(Default)]
pub struct MockPaymentRepository {
    payments: Mutex<Vec<Payment>>,
    fail_creates: AtomicBool,
}

impl MockPaymentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created_payments(&self) -> Vec<Payment> {
        self.payments.lock().unwrap().clone()
    }

    pub fn fail_creates(&self) {
        self.fail_creates.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl PaymentRepository for MockPaymentRepository {
    async fn create(&self, payment: &Payment) -> Result<(), DomainError> {
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(db_error("payment write rejected"));
        }
        self.payments.lock().unwrap().push(payment.clone());
        Ok(())
    }

    async fn find_by_order(&self, order_id: &OrderId) -> Result<Option<Payment>, DomainError> {
        Ok(self
            .payments
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.order_id == *order_id)
            .cloned())
    }
}

// ============================================================
// MockLicenseRepository
// ============================================================

#[derive(Default)]
pub struct MockLicenseRepository {
    licenses: Mutex<Vec<License>>,
    summaries: Mutex<Vec<LicenseSummary>>,
    fail_creates: AtomicBool,
    fail_downloads: AtomicBool,
}

impl MockLicenseRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_license(license: License) -> Self {
        let repo = Self::new();
        repo.licenses.lock().unwrap().push(license);
        repo
    }

    pub fn with_summaries(summaries: Vec<LicenseSummary>) -> Self {
        let repo = Self::new();
        for summary in &summaries {
            repo.licenses.lock().unwrap().push(summary.license.clone());
        }
        *repo.summaries.lock().unwrap() = summaries;
        repo
    }

    pub fn created_licenses(&self) -> Vec<License> {
        self.licenses.lock().unwrap().clone()
    }

    pub fn download_count(&self, id: &LicenseId) -> i64 {
        self.licenses
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.id == *id)
            .map(|l| l.downloads)
            .unwrap_or(0)
    }

    pub fn fail_creates(&self) {
        self.fail_creates.store(true, Ordering::SeqCst);
    }

    pub fn fail_downloads(&self) {
        self.fail_downloads.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl LicenseRepository for MockLicenseRepository {
    async fn create(&self, license: &License) -> Result<(), DomainError> {
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(db_error("license write rejected"));
        }
        self.licenses.lock().unwrap().push(license.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &LicenseId) -> Result<Option<License>, DomainError> {
        Ok(self
            .licenses
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.id == *id)
            .cloned())
    }

    async fn find_by_order(&self, order_id: &OrderId) -> Result<Option<License>, DomainError> {
        Ok(self
            .licenses
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.order_id == *order_id)
            .cloned())
    }

    async fn record_download(&self, id: &LicenseId) -> Result<(), DomainError> {
        if self.fail_downloads.load(Ordering::SeqCst) {
            return Err(db_error("counter write rejected"));
        }
        let mut licenses = self.licenses.lock().unwrap();
        if let Some(license) = licenses.iter_mut().find(|l| l.id == *id) {
            license.downloads += 1;
            license.last_downloaded_at = Some(Timestamp::now());
        }
        Ok(())
    }

    async fn list_for_buyer(
        &self,
        buyer_id: &UserId,
        filter: &LicenseListFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<LicenseSummary>, DomainError> {
        let matching: Vec<LicenseSummary> = self
            .summaries
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.license.buyer_id == *buyer_id)
            .filter(|s| match &filter.title_search {
                Some(needle) => s
                    .track_title
                    .to_lowercase()
                    .contains(&needle.to_lowercase()),
                None => true,
            })
            .filter(|s| match &filter.license_type {
                Some(kind) => s.license.license_type == *kind,
                None => true,
            })
            .cloned()
            .collect();
        Ok(page(&matching, limit, offset))
    }
}

// ============================================================
// MockCatalogReader
// ============================================================

#[derive(Default)]
pub struct MockCatalogReader {
    track: Option<(Track, Vec<crate::ports::LicenseOption>)>,
}

impl MockCatalogReader {
    pub fn with_track(track: Track, options: Vec<crate::ports::LicenseOption>) -> Self {
        Self {
            track: Some((track, options)),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogReader for MockCatalogReader {
    async fn find_with_license_options(
        &self,
        id: &TrackId,
    ) -> Result<Option<(Track, Vec<crate::ports::LicenseOption>)>, DomainError> {
        Ok(self
            .track
            .as_ref()
            .filter(|(t, _)| t.id == *id && !t.is_deleted)
            .cloned())
    }

    async fn find_by_id_including_deleted(
        &self,
        id: &TrackId,
    ) -> Result<Option<Track>, DomainError> {
        Ok(self
            .track
            .as_ref()
            .map(|(t, _)| t.clone())
            .filter(|t| t.id == *id))
    }
}

// ============================================================
// MockGateway
// ============================================================

#[derive(Default)]
pub struct MockGateway {
    created: Mutex<Vec<Money>>,
    payment: Option<GatewayPayment>,
    failing: bool,
    fetches: AtomicUsize,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gateway where every call fails.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Gateway with a captured payment on record.
    pub fn paying(payment_id: &str) -> Self {
        Self::with_payment(paid_gateway_payment(payment_id, "captured"))
    }

    pub fn with_payment(payment: GatewayPayment) -> Self {
        Self {
            payment: Some(payment),
            ..Self::default()
        }
    }

    /// Amounts of every remote order opened so far.
    pub fn created_orders(&self) -> Vec<Money> {
        self.created.lock().unwrap().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_remote_order(&self, amount: &Money) -> Result<String, GatewayError> {
        if self.failing {
            return Err(GatewayError::Request("connection refused".to_string()));
        }
        self.created.lock().unwrap().push(amount.clone());
        Ok("order_gw_1".to_string())
    }

    async fn fetch_payment(
        &self,
        gateway_payment_id: &str,
    ) -> Result<GatewayPayment, GatewayError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(GatewayError::Request("connection refused".to_string()));
        }
        self.payment
            .as_ref()
            .filter(|p| p.id == gateway_payment_id)
            .cloned()
            .ok_or_else(|| GatewayError::InvalidResponse("no such payment".to_string()))
    }
}

// ============================================================
// MockLinkProvider
// ============================================================

#[derive(Default)]
pub struct MockLinkProvider {
    fail_signing: AtomicBool,
}

impl MockLinkProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_signing(&self) {
        self.fail_signing.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl FileLinkProvider for MockLinkProvider {
    fn key_from_url(&self, url: &str) -> Result<String, LinkError> {
        url.strip_prefix(STORAGE_BASE_URL)
            .map(String::from)
            .ok_or_else(|| LinkError::ForeignUrl(url.to_string()))
    }

    async fn presigned_url(&self, key: &str, ttl: Duration) -> Result<String, LinkError> {
        if self.fail_signing.load(Ordering::SeqCst) {
            return Err(LinkError::Signing("signer unavailable".to_string()));
        }
        Ok(format!(
            "{}{}?sig=test&expires={}",
            STORAGE_BASE_URL,
            key,
            ttl.as_secs()
        ))
    }
}
