use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use wanderlust_booking::BookingManager;
use wanderlust_catalog::Catalog;
use wanderlust_core::inquiry::InquiryDesk;
use wanderlust_store::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub bookings: Arc<Mutex<BookingManager>>,
    pub session: Arc<SessionStore>,
    pub inquiries: Arc<InquiryDesk>,
}

impl AppState {
    pub fn new(
        catalog: Catalog,
        bookings: BookingManager,
        session: SessionStore,
        inquiries: InquiryDesk,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            bookings: Arc::new(Mutex::new(bookings)),
            session: Arc::new(session),
            inquiries: Arc::new(inquiries),
        }
    }

    /// Drop idle booking drafts on a fixed schedule until the runtime shuts down
    pub fn spawn_draft_sweeper(&self, every: Duration) -> JoinHandle<()> {
        let bookings = self.bookings.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                bookings.lock().await.cleanup_expired();
            }
        })
    }
}
