//! Shared fixtures for the in-memory integration suites.
#![allow(dead_code, reason = "each suite uses a different subset of the helpers")]

use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use chrono::{Duration as ChronoDuration, Utc};
use mockable::DefaultClock;
use rust_decimal::Decimal;

use ticketing::domain::ports::{CatalogueCache, EventRepository, UserRepository};
use ticketing::domain::{
    AnalyticsService, CatalogueService, Event, EventDetails, EventId, MirrorPublisher,
    OrderQueryService, Organizer, PasswordHash, RegistrationService, ReservationService,
    TicketType, TicketTypeId, User, UserId, UserProfile,
};
use ticketing::inbound::http::state::HttpState;
use ticketing::outbound::cache::MemoryCatalogueCache;
use ticketing::outbound::memory::{MemoryCatalogue, MemoryUserRepository};
use ticketing::outbound::security::BcryptPasswordHasher;

pub const BUYER: &str = "ada@example.com";

pub type MemoryReservations = ReservationService<MemoryUserRepository, MemoryCatalogue, MemoryCatalogue>;

/// Event builder covering the fields the suites care about.
pub struct EventSpec<'a> {
    pub id: &'a str,
    pub city: Option<&'a str>,
    pub organizer: Option<&'a str>,
    pub duration_minutes: Option<u32>,
    pub starts_in: ChronoDuration,
    pub tiers: Vec<(&'a str, Decimal, u32)>,
}

impl<'a> EventSpec<'a> {
    pub fn new(id: &'a str, tiers: Vec<(&'a str, Decimal, u32)>) -> Self {
        Self {
            id,
            city: None,
            organizer: None,
            duration_minutes: None,
            starts_in: ChronoDuration::days(30),
            tiers,
        }
    }

    pub fn build(self) -> Event {
        Event::new(
            EventId::new(self.id).expect("event id"),
            EventDetails {
                title: format!("Event {}", self.id),
                city: self.city.map(str::to_owned),
                venue: None,
                category: None,
                starts_at: Utc::now() + self.starts_in,
                duration_minutes: self.duration_minutes,
                age_restriction: None,
            },
            self.organizer.map(|name| Organizer {
                name: name.to_owned(),
                contact: None,
            }),
            self.tiers
                .into_iter()
                .map(|(id, price, remaining)| TicketType {
                    id: TicketTypeId::new(id).expect("ticket type id"),
                    price,
                    remaining,
                })
                .collect(),
        )
        .expect("valid event")
    }
}

/// In-memory stores wired into the HTTP state.
pub struct Harness {
    pub catalogue: Arc<MemoryCatalogue>,
    pub users: Arc<MemoryUserRepository>,
    pub cache: Arc<MemoryCatalogueCache>,
    pub purchases: Arc<MemoryReservations>,
    pub state: web::Data<HttpState>,
}

impl Harness {
    pub fn new(events: impl IntoIterator<Item = Event>) -> Self {
        let catalogue = Arc::new(MemoryCatalogue::with_events(events));
        let users = Arc::new(MemoryUserRepository::default());
        let cache = Arc::new(MemoryCatalogueCache::new(Duration::from_secs(300)));
        let shared_cache: Arc<dyn CatalogueCache> = cache.clone();
        let clock = Arc::new(DefaultClock);
        let purchases = Arc::new(ReservationService::new(
            Arc::clone(&users),
            Arc::clone(&catalogue),
            Arc::clone(&catalogue),
            Arc::clone(&shared_cache),
            MirrorPublisher::disabled(),
            clock.clone(),
        ));
        let state = web::Data::new(HttpState {
            purchases: purchases.clone(),
            events: Arc::new(CatalogueService::new(
                Arc::clone(&catalogue),
                Arc::clone(&shared_cache),
                clock,
            )),
            registration: Arc::new(RegistrationService::new(
                Arc::clone(&users),
                Arc::new(BcryptPasswordHasher::with_cost(4)),
                MirrorPublisher::disabled(),
            )),
            analytics: Arc::new(AnalyticsService::new(
                Arc::clone(&catalogue),
                Arc::clone(&catalogue),
                shared_cache,
            )),
            orders: Arc::new(OrderQueryService::new(Arc::clone(&catalogue))),
        });
        Self {
            catalogue,
            users,
            cache,
            purchases,
            state,
        }
    }

    /// Store a user directly, bypassing registration.
    pub async fn add_user(&self, email: &str) {
        let user = User {
            id: UserId::new(email).expect("user id"),
            profile: UserProfile::default(),
            password_hash: PasswordHash::new("not-a-real-hash"),
        };
        self.users.insert(&user).await.expect("insert user");
    }

    /// Remaining units for one ticket type, read from the store.
    pub async fn remaining(&self, event: &str, ticket_type: &str) -> u32 {
        let event = self
            .catalogue
            .find_by_id(&EventId::new(event).expect("event id"))
            .await
            .expect("catalogue read")
            .expect("event exists");
        event
            .ticket_type(&TicketTypeId::new(ticket_type).expect("ticket type id"))
            .expect("ticket type exists")
            .remaining
    }
}
