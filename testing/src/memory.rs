//! In-memory implementation of every repository trait.
//!
//! All data sits behind one mutex and every operation runs to completion
//! while holding it, so check-then-write operations are atomic exactly like
//! their transactional Postgres counterparts.

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use voyage_core::ids::{CarBookingId, CarProviderId, HotelBookingId, HotelId, UserId, VehicleId};
use voyage_core::model::{
    BookingFilter, BookingParty, CarBooking, CarProvider, Credentials, Hotel, HotelBooking,
    HotelBookingWithGuest, NewCarBooking, NewCarProvider, NewHotel, NewHotelBooking, NewUser,
    NewVehicle, ProviderCarBooking, ProviderContact, RoomAvailability, StatusChange, User,
    UserCarBooking, Vehicle, VehicleSnapshot,
};
use voyage_core::status::BookingStatus;
use voyage_core::store::{
    BookingLedger, CredentialStore, InventoryStore, Readiness, StoreError, StoreFuture,
};

/// Principal record plus its password hash.
#[derive(Debug)]
struct Account<P> {
    seq: u64,
    principal: P,
    password_hash: String,
}

/// Record tagged with its insertion order, used to break timestamp ties.
#[derive(Debug)]
struct Row<T> {
    seq: u64,
    record: T,
}

trait HasEmail {
    fn email(&self) -> &str;
}

impl HasEmail for User {
    fn email(&self) -> &str {
        &self.email
    }
}

impl HasEmail for CarProvider {
    fn email(&self) -> &str {
        &self.email
    }
}

impl HasEmail for Hotel {
    fn email(&self) -> &str {
        &self.email
    }
}

#[derive(Debug, Default)]
struct State {
    next_seq: u64,
    users: HashMap<UserId, Account<User>>,
    car_providers: HashMap<CarProviderId, Account<CarProvider>>,
    hotels: HashMap<HotelId, Account<Hotel>>,
    vehicles: HashMap<VehicleId, Row<Vehicle>>,
    /// One entry per reserved vehicle-day, naming the booking that holds it.
    booked_days: BTreeMap<(VehicleId, NaiveDate), CarBookingId>,
    availability: BTreeMap<(HotelId, NaiveDate), u32>,
    car_bookings: HashMap<CarBookingId, Row<CarBooking>>,
    hotel_bookings: HashMap<HotelBookingId, Row<HotelBooking>>,
}

impl State {
    const fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn booked_days(&self, vehicle_id: VehicleId) -> Vec<NaiveDate> {
        self.booked_days
            .range((vehicle_id, NaiveDate::MIN)..=(vehicle_id, NaiveDate::MAX))
            .map(|((_, day), _)| *day)
            .collect()
    }

    fn vehicle(&self, row: &Row<Vehicle>) -> Vehicle {
        Vehicle {
            booked_dates: self.booked_days(row.record.id),
            ..row.record.clone()
        }
    }

    fn party(&self, user_id: UserId) -> Result<BookingParty, StoreError> {
        let account = self
            .users
            .get(&user_id)
            .ok_or_else(|| StoreError::not_found("User", user_id))?;
        Ok(BookingParty {
            id: user_id,
            name: account.principal.name.clone(),
            email: account.principal.email.clone(),
        })
    }

    fn snapshot(&self, vehicle_id: VehicleId) -> Option<VehicleSnapshot> {
        self.vehicles
            .get(&vehicle_id)
            .map(|row| VehicleSnapshot::from(&row.record))
    }
}

fn find_account<K, P: HasEmail + Clone>(
    accounts: &HashMap<K, Account<P>>,
    email: &str,
) -> Option<Credentials<P>> {
    accounts
        .values()
        .find(|account| account.principal.email() == email)
        .map(|account| Credentials {
            principal: account.principal.clone(),
            password_hash: account.password_hash.clone(),
        })
}

fn email_taken<K, P: HasEmail>(accounts: &HashMap<K, Account<P>>, email: &str) -> bool {
    accounts
        .values()
        .any(|account| account.principal.email() == email)
}

fn oldest_first<K, P: Clone>(accounts: &HashMap<K, Account<P>>) -> Vec<P> {
    let mut accounts: Vec<&Account<P>> = accounts.values().collect();
    accounts.sort_by_key(|account| account.seq);
    accounts
        .into_iter()
        .map(|account| account.principal.clone())
        .collect()
}

fn newest_first<T>(rows: &mut [&Row<T>], created_at: impl Fn(&T) -> DateTime<Utc>) {
    rows.sort_by(|a, b| {
        created_at(&b.record)
            .cmp(&created_at(&a.record))
            .then(b.seq.cmp(&a.seq))
    });
}

/// In-memory store for tests and local experiments.
///
/// Cloning shares the underlying data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
    offline: Arc<AtomicBool>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make [`Readiness::ping`] fail, simulating a lost database.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn run<T, F>(&self, op: F) -> StoreFuture<'static, T>
    where
        T: Send + 'static,
        F: FnOnce(&mut State) -> Result<T, StoreError> + Send + 'static,
    {
        let state = Arc::clone(&self.state);
        Box::pin(async move {
            let mut guard = state
                .lock()
                .map_err(|_| StoreError::Database("in-memory store lock poisoned".to_string()))?;
            op(&mut guard)
        })
    }
}

impl CredentialStore for InMemoryStore {
    fn create_user(&self, user: NewUser) -> StoreFuture<'_, User> {
        self.run(move |state| {
            if email_taken(&state.users, &user.email) {
                return Err(StoreError::DuplicateEmail { email: user.email });
            }
            let record = User {
                id: UserId::new(),
                name: user.name,
                email: user.email,
                phone: user.phone,
                plan: None,
                created_at: user.created_at,
            };
            let seq = state.next_seq();
            state.users.insert(
                record.id,
                Account {
                    seq,
                    principal: record.clone(),
                    password_hash: user.password_hash,
                },
            );
            Ok(record)
        })
    }

    fn create_car_provider(&self, provider: NewCarProvider) -> StoreFuture<'_, CarProvider> {
        self.run(move |state| {
            if email_taken(&state.car_providers, &provider.email) {
                return Err(StoreError::DuplicateEmail {
                    email: provider.email,
                });
            }
            let record = CarProvider {
                id: CarProviderId::new(),
                name: provider.name,
                email: provider.email,
                phone: provider.phone,
                created_at: provider.created_at,
            };
            let seq = state.next_seq();
            state.car_providers.insert(
                record.id,
                Account {
                    seq,
                    principal: record.clone(),
                    password_hash: provider.password_hash,
                },
            );
            Ok(record)
        })
    }

    fn create_hotel(&self, hotel: NewHotel) -> StoreFuture<'_, Hotel> {
        self.run(move |state| {
            if email_taken(&state.hotels, &hotel.email) {
                return Err(StoreError::DuplicateEmail { email: hotel.email });
            }
            let record = Hotel {
                id: HotelId::new(),
                name: hotel.name,
                email: hotel.email,
                phone: hotel.phone,
                image: hotel.image,
                location: hotel.location,
                address: hotel.address,
                rooms: hotel.rooms,
                rent: hotel.rent,
                created_at: hotel.created_at,
            };
            let seq = state.next_seq();
            state.hotels.insert(
                record.id,
                Account {
                    seq,
                    principal: record.clone(),
                    password_hash: hotel.password_hash,
                },
            );
            Ok(record)
        })
    }

    fn find_user_by_email<'a>(
        &'a self,
        email: &'a str,
    ) -> StoreFuture<'a, Option<Credentials<User>>> {
        let email = email.to_string();
        self.run(move |state| Ok(find_account(&state.users, &email)))
    }

    fn find_car_provider_by_email<'a>(
        &'a self,
        email: &'a str,
    ) -> StoreFuture<'a, Option<Credentials<CarProvider>>> {
        let email = email.to_string();
        self.run(move |state| Ok(find_account(&state.car_providers, &email)))
    }

    fn find_hotel_by_email<'a>(
        &'a self,
        email: &'a str,
    ) -> StoreFuture<'a, Option<Credentials<Hotel>>> {
        let email = email.to_string();
        self.run(move |state| Ok(find_account(&state.hotels, &email)))
    }

    fn get_user(&self, id: UserId) -> StoreFuture<'_, Option<User>> {
        self.run(move |state| Ok(state.users.get(&id).map(|a| a.principal.clone())))
    }

    fn get_car_provider(&self, id: CarProviderId) -> StoreFuture<'_, Option<CarProvider>> {
        self.run(move |state| Ok(state.car_providers.get(&id).map(|a| a.principal.clone())))
    }

    fn get_hotel(&self, id: HotelId) -> StoreFuture<'_, Option<Hotel>> {
        self.run(move |state| Ok(state.hotels.get(&id).map(|a| a.principal.clone())))
    }

    fn set_user_plan(&self, id: UserId, plan: serde_json::Value) -> StoreFuture<'_, User> {
        self.run(move |state| {
            let account = state
                .users
                .get_mut(&id)
                .ok_or_else(|| StoreError::not_found("User", id))?;
            account.principal.plan = Some(plan);
            Ok(account.principal.clone())
        })
    }

    fn list_users(&self) -> StoreFuture<'_, Vec<User>> {
        self.run(|state| Ok(oldest_first(&state.users)))
    }

    fn list_car_providers(&self) -> StoreFuture<'_, Vec<CarProvider>> {
        self.run(|state| Ok(oldest_first(&state.car_providers)))
    }

    fn list_hotels(&self) -> StoreFuture<'_, Vec<Hotel>> {
        self.run(|state| Ok(oldest_first(&state.hotels)))
    }
}

impl InventoryStore for InMemoryStore {
    fn add_vehicle(
        &self,
        provider_id: CarProviderId,
        vehicle: NewVehicle,
    ) -> StoreFuture<'_, Vehicle> {
        self.run(move |state| {
            if !state.car_providers.contains_key(&provider_id) {
                return Err(StoreError::not_found("CarProvider", provider_id));
            }
            let record = Vehicle {
                id: VehicleId::new(),
                provider_id,
                model: vehicle.model,
                rent: vehicle.rent,
                registration_number: vehicle.registration_number,
                image: vehicle.image,
                booked_dates: Vec::new(),
                created_at: vehicle.created_at,
            };
            let seq = state.next_seq();
            state.vehicles.insert(
                record.id,
                Row {
                    seq,
                    record: record.clone(),
                },
            );
            Ok(record)
        })
    }

    fn remove_vehicle(
        &self,
        provider_id: CarProviderId,
        vehicle_id: VehicleId,
    ) -> StoreFuture<'_, ()> {
        self.run(move |state| {
            let owned = state
                .vehicles
                .get(&vehicle_id)
                .is_some_and(|row| row.record.provider_id == provider_id);
            if !owned {
                return Err(StoreError::not_found("Vehicle", vehicle_id));
            }
            let in_use = state
                .car_bookings
                .values()
                .any(|row| row.record.vehicle_id == vehicle_id && row.record.status.is_active());
            if in_use {
                return Err(StoreError::VehicleInUse(vehicle_id));
            }
            state.vehicles.remove(&vehicle_id);
            state.booked_days.retain(|(vehicle, _), _| *vehicle != vehicle_id);
            Ok(())
        })
    }

    fn get_vehicle(&self, id: VehicleId) -> StoreFuture<'_, Option<Vehicle>> {
        self.run(move |state| Ok(state.vehicles.get(&id).map(|row| state.vehicle(row))))
    }

    fn list_provider_vehicles(
        &self,
        provider_id: CarProviderId,
    ) -> StoreFuture<'_, Vec<Vehicle>> {
        self.run(move |state| {
            let mut rows: Vec<&Row<Vehicle>> = state
                .vehicles
                .values()
                .filter(|row| row.record.provider_id == provider_id)
                .collect();
            rows.sort_by_key(|row| row.seq);
            Ok(rows.into_iter().map(|row| state.vehicle(row)).collect())
        })
    }

    fn list_all_vehicles(&self) -> StoreFuture<'_, Vec<Vehicle>> {
        self.run(|state| {
            let mut rows: Vec<&Row<Vehicle>> = state.vehicles.values().collect();
            rows.sort_by_key(|row| row.seq);
            Ok(rows.into_iter().map(|row| state.vehicle(row)).collect())
        })
    }

    fn set_room_availability(
        &self,
        availability: RoomAvailability,
    ) -> StoreFuture<'_, RoomAvailability> {
        self.run(move |state| {
            if !state.hotels.contains_key(&availability.hotel_id) {
                return Err(StoreError::not_found("Hotel", availability.hotel_id));
            }
            state.availability.insert(
                (availability.hotel_id, availability.date),
                availability.available_rooms,
            );
            Ok(availability)
        })
    }

    fn list_room_availability(
        &self,
        hotel_id: HotelId,
    ) -> StoreFuture<'_, Vec<RoomAvailability>> {
        self.run(move |state| {
            Ok(state
                .availability
                .range((hotel_id, NaiveDate::MIN)..=(hotel_id, NaiveDate::MAX))
                .map(|((hotel_id, date), rooms)| RoomAvailability {
                    hotel_id: *hotel_id,
                    date: *date,
                    available_rooms: *rooms,
                })
                .collect())
        })
    }
}

impl BookingLedger for InMemoryStore {
    fn reserve_vehicle(&self, booking: NewCarBooking) -> StoreFuture<'_, CarBooking> {
        self.run(move |state| {
            let vehicle_id = booking.vehicle_id;
            let provider_id = state
                .vehicles
                .get(&vehicle_id)
                .map(|row| row.record.provider_id)
                .ok_or_else(|| StoreError::not_found("Vehicle", vehicle_id))?;
            if !state.users.contains_key(&booking.user_id) {
                return Err(StoreError::not_found("User", booking.user_id));
            }

            let taken: Vec<NaiveDate> = booking
                .dates
                .as_slice()
                .iter()
                .copied()
                .filter(|day| state.booked_days.contains_key(&(vehicle_id, *day)))
                .collect();
            if !taken.is_empty() {
                return Err(StoreError::DatesUnavailable {
                    vehicle_id,
                    dates: taken,
                });
            }

            let record = CarBooking {
                id: CarBookingId::new(),
                user_id: booking.user_id,
                vehicle_id,
                provider_id,
                dates: booking.dates.into(),
                status: BookingStatus::Pending,
                created_at: booking.created_at,
            };
            for day in &record.dates {
                state.booked_days.insert((vehicle_id, *day), record.id);
            }
            let seq = state.next_seq();
            state.car_bookings.insert(
                record.id,
                Row {
                    seq,
                    record: record.clone(),
                },
            );
            Ok(record)
        })
    }

    fn create_hotel_booking(&self, booking: NewHotelBooking) -> StoreFuture<'_, HotelBooking> {
        self.run(move |state| {
            if !state.hotels.contains_key(&booking.hotel_id) {
                return Err(StoreError::not_found("Hotel", booking.hotel_id));
            }
            if !state.users.contains_key(&booking.user_id) {
                return Err(StoreError::not_found("User", booking.user_id));
            }
            let record = HotelBooking {
                id: HotelBookingId::new(),
                user_id: booking.user_id,
                hotel_id: booking.hotel_id,
                start_date: booking.stay.start(),
                end_date: booking.stay.end(),
                rooms: booking.rooms,
                status: BookingStatus::Pending,
                created_at: booking.created_at,
            };
            let seq = state.next_seq();
            state.hotel_bookings.insert(
                record.id,
                Row {
                    seq,
                    record: record.clone(),
                },
            );
            Ok(record)
        })
    }

    fn get_car_booking(&self, id: CarBookingId) -> StoreFuture<'_, Option<CarBooking>> {
        self.run(move |state| Ok(state.car_bookings.get(&id).map(|row| row.record.clone())))
    }

    fn get_hotel_booking(&self, id: HotelBookingId) -> StoreFuture<'_, Option<HotelBooking>> {
        self.run(move |state| Ok(state.hotel_bookings.get(&id).map(|row| row.record.clone())))
    }

    fn set_car_booking_status(
        &self,
        id: CarBookingId,
        provider_id: CarProviderId,
        status: BookingStatus,
    ) -> StoreFuture<'_, StatusChange<CarBooking>> {
        self.run(move |state| {
            let row = state
                .car_bookings
                .get_mut(&id)
                .ok_or_else(|| StoreError::not_found("Booking", id))?;
            if row.record.provider_id != provider_id {
                return Err(StoreError::not_owner("Booking", id));
            }
            let previous = row.record.status;
            row.record.status = previous.transition_to(status)?;
            let booking = row.record.clone();

            if previous.is_active() && !booking.status.is_active() {
                state.booked_days.retain(|_, holder| *holder != id);
            }
            Ok(StatusChange { previous, booking })
        })
    }

    fn set_hotel_booking_status(
        &self,
        id: HotelBookingId,
        hotel_id: HotelId,
        status: BookingStatus,
    ) -> StoreFuture<'_, StatusChange<HotelBooking>> {
        self.run(move |state| {
            let row = state
                .hotel_bookings
                .get_mut(&id)
                .ok_or_else(|| StoreError::not_found("Booking", id))?;
            if row.record.hotel_id != hotel_id {
                return Err(StoreError::not_owner("Booking", id));
            }
            let previous = row.record.status;
            row.record.status = previous.transition_to(status)?;
            Ok(StatusChange {
                previous,
                booking: row.record.clone(),
            })
        })
    }

    fn list_car_bookings_for_provider(
        &self,
        provider_id: CarProviderId,
        filter: BookingFilter,
    ) -> StoreFuture<'_, Vec<ProviderCarBooking>> {
        self.run(move |state| {
            let mut rows: Vec<&Row<CarBooking>> = state
                .car_bookings
                .values()
                .filter(|row| {
                    row.record.provider_id == provider_id && filter.matches(row.record.status)
                })
                .collect();
            newest_first(&mut rows, |booking| booking.created_at);
            rows.into_iter()
                .map(|row| {
                    Ok(ProviderCarBooking {
                        booking: row.record.clone(),
                        user: state.party(row.record.user_id)?,
                        vehicle: state.snapshot(row.record.vehicle_id),
                    })
                })
                .collect()
        })
    }

    fn list_hotel_bookings_for_hotel(
        &self,
        hotel_id: HotelId,
        filter: BookingFilter,
    ) -> StoreFuture<'_, Vec<HotelBookingWithGuest>> {
        self.run(move |state| {
            let mut rows: Vec<&Row<HotelBooking>> = state
                .hotel_bookings
                .values()
                .filter(|row| row.record.hotel_id == hotel_id && filter.matches(row.record.status))
                .collect();
            match filter {
                BookingFilter::Pending => newest_first(&mut rows, |booking| booking.created_at),
                BookingFilter::All => rows.sort_by(|a, b| {
                    b.record
                        .start_date
                        .cmp(&a.record.start_date)
                        .then(b.seq.cmp(&a.seq))
                }),
            }
            rows.into_iter()
                .map(|row| {
                    Ok(HotelBookingWithGuest {
                        booking: row.record.clone(),
                        user: state.party(row.record.user_id)?,
                    })
                })
                .collect()
        })
    }

    fn list_car_bookings_for_user(&self, user_id: UserId) -> StoreFuture<'_, Vec<UserCarBooking>> {
        self.run(move |state| {
            let mut rows: Vec<&Row<CarBooking>> = state
                .car_bookings
                .values()
                .filter(|row| row.record.user_id == user_id)
                .collect();
            newest_first(&mut rows, |booking| booking.created_at);
            rows.into_iter()
                .map(|row| {
                    let provider = state
                        .car_providers
                        .get(&row.record.provider_id)
                        .map(|account| &account.principal)
                        .ok_or_else(|| {
                            StoreError::not_found("CarProvider", row.record.provider_id)
                        })?;
                    Ok(UserCarBooking {
                        booking: row.record.clone(),
                        vehicle: state.snapshot(row.record.vehicle_id),
                        provider: ProviderContact {
                            id: provider.id,
                            name: provider.name.clone(),
                            email: provider.email.clone(),
                            phone: provider.phone.clone(),
                        },
                    })
                })
                .collect()
        })
    }

    fn list_hotel_bookings_for_user(
        &self,
        user_id: UserId,
    ) -> StoreFuture<'_, Vec<HotelBooking>> {
        self.run(move |state| {
            let mut rows: Vec<&Row<HotelBooking>> = state
                .hotel_bookings
                .values()
                .filter(|row| row.record.user_id == user_id)
                .collect();
            newest_first(&mut rows, |booking| booking.created_at);
            Ok(rows.into_iter().map(|row| row.record.clone()).collect())
        })
    }
}

impl Readiness for InMemoryStore {
    fn ping(&self) -> StoreFuture<'_, ()> {
        let offline = self.offline.load(Ordering::SeqCst);
        Box::pin(async move {
            if offline {
                Err(StoreError::Database("store is offline".to_string()))
            } else {
                Ok(())
            }
        })
    }
}
