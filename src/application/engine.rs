use super::conflict::IntervalConflictChecker;
use super::room_locks::RoomLocks;
use crate::domain::catalog::{ActorId, HotelId, Room, RoomId};
use crate::domain::money::Amount;
use crate::domain::payment::Payment;
use crate::domain::ports::{
    ActorLookupBox, CatalogLookupBox, ClockBox, PaymentProcessorBox, ReservationStoreBox,
};
use crate::domain::pricing;
use crate::domain::reservation::{
    Reservation, ReservationId, ReservationRequest, ReservationStatus, ReservationView,
    sort_by_check_in_desc,
};
use crate::domain::stay::StayDates;
use crate::error::{ReservationError, Result};
use crate::infrastructure::clock::SystemClock;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, error, info, warn};

/// How a caller-supplied total price is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricePolicy {
    /// Charge what the caller quoted.
    #[default]
    Trust,
    /// Reject quotes that differ from the category price.
    Verify,
}

/// Books rooms without ever double-booking them.
///
/// `ReservationEngine` owns its collaborators behind ports and is meant to be
/// shared (e.g. in an `Arc`) between concurrent callers. Every `create` for a
/// given room runs under that room's lock for its whole duration, including
/// the payment attempt, so the conflict check and the commit cannot interleave
/// with another booking of the same room.
pub struct ReservationEngine {
    actors: ActorLookupBox,
    catalog: CatalogLookupBox,
    reservations: ReservationStoreBox,
    payments: PaymentProcessorBox,
    clock: ClockBox,
    room_locks: RoomLocks,
    price_policy: PricePolicy,
}

impl ReservationEngine {
    /// Creates a new `ReservationEngine` using the system clock and
    /// [`PricePolicy::Trust`].
    ///
    /// # Arguments
    ///
    /// * `actors` - Resolves the actor making a request.
    /// * `catalog` - Resolves hotels and rooms.
    /// * `reservations` - Where confirmed reservations and their payments live.
    /// * `payments` - The gateway used to settle each stay.
    pub fn new(
        actors: ActorLookupBox,
        catalog: CatalogLookupBox,
        reservations: ReservationStoreBox,
        payments: PaymentProcessorBox,
    ) -> Self {
        Self {
            actors,
            catalog,
            reservations,
            payments,
            clock: Box::new(SystemClock),
            room_locks: RoomLocks::new(),
            price_policy: PricePolicy::default(),
        }
    }

    pub fn with_clock(mut self, clock: ClockBox) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_price_policy(mut self, price_policy: PricePolicy) -> Self {
        self.price_policy = price_policy;
        self
    }

    /// Books a room for `actor_id`.
    ///
    /// Either the reservation and its successful payment are both persisted
    /// and returned, or nothing is persisted and a typed error is returned.
    pub async fn create(
        &self,
        request: ReservationRequest,
        actor_id: ActorId,
    ) -> Result<Reservation> {
        let actor = self
            .actors
            .get_by_id(actor_id)
            .await?
            .ok_or_else(|| ReservationError::not_found("Actor", actor_id))?;
        let hotel = self
            .catalog
            .get_hotel(request.hotel_id)
            .await?
            .ok_or_else(|| ReservationError::not_found("Hotel", request.hotel_id))?;
        let room = self
            .catalog
            .get_room(request.room_id)
            .await?
            .ok_or_else(|| ReservationError::not_found("Room", request.room_id))?;

        let dates = StayDates::new(request.check_in, request.check_out)?;
        if request.guests == 0 {
            return Err(ReservationError::InvalidRequest(
                "guest count must be positive".to_string(),
            ));
        }
        if room.hotel_id != hotel.id {
            return Err(ReservationError::InvalidRequest(format!(
                "room {} does not belong to hotel {}",
                room.id, hotel.id
            )));
        }
        if !room.is_bookable() {
            return Err(ReservationError::InvalidRequest(format!(
                "room {} is not available for booking",
                room.id
            )));
        }
        if let Some(id) = request.reservation_id
            && self.reservations.get(id).await?.is_some()
        {
            return Err(ReservationError::InvalidRequest(format!(
                "reservation id {id} is already in use"
            )));
        }

        info!(
            actor = %actor.name,
            room = room.id,
            check_in = %dates.check_in(),
            check_out = %dates.check_out(),
            "Creating reservation"
        );

        let _room_guard = self.room_locks.acquire(room.id).await;

        if IntervalConflictChecker::new(self.reservations.as_ref())
            .has_conflict(room.id, &dates)
            .await?
        {
            warn!(room = room.id, "Rejected overlapping reservation");
            return Err(ReservationError::Conflict { room_id: room.id });
        }

        let total_price = self.resolve_price(&room, &dates, request.total_price)?;
        let mut reservation = Reservation::tentative(
            actor_id,
            hotel.id,
            room.id,
            dates,
            request.guests,
            request.note,
            total_price,
        );
        if let Some(id) = request.reservation_id {
            reservation.id = id;
        }
        let mut payment = Payment::pending(
            reservation.id,
            total_price,
            request.payment_method.kind(),
            self.clock.now(),
        );

        let settlement = self
            .payments
            .attempt(&request.payment_method, total_price)
            .await;
        payment.settle(settlement, self.clock.now())?;

        if payment.is_failed() {
            warn!(
                room = room.id,
                method = %request.payment_method,
                "Payment declined, discarding tentative reservation"
            );
            return Err(ReservationError::PaymentDeclined {
                method: payment.method.tag(),
                transaction_id: payment.transaction_id.unwrap_or_default(),
            });
        }

        if let Err(err) = self
            .reservations
            .insert(reservation.clone(), payment.clone())
            .await
        {
            let refunded = self
                .payments
                .refund(&request.payment_method, total_price)
                .await;
            error!(
                room = room.id,
                refunded,
                error = %err,
                "Commit failed after successful payment"
            );
            return Err(err);
        }

        reservation.payment = Some(payment);
        info!(reservation = %reservation.id, %total_price, "Reservation confirmed");
        Ok(reservation)
    }

    /// Cancels a future reservation on behalf of its owner.
    pub async fn cancel(&self, reservation_id: ReservationId, actor_id: ActorId) -> Result<()> {
        let reservation = self
            .reservations
            .get(reservation_id)
            .await?
            .ok_or_else(|| ReservationError::not_found("Reservation", reservation_id))?;

        if reservation.actor_id != actor_id {
            return Err(ReservationError::Forbidden {
                actor_id,
                reservation_id,
            });
        }

        let today = self.clock.today();
        if !reservation.is_cancellable(today) {
            return Err(ReservationError::InvalidState(format!(
                "reservation {} is {} with check-in {} and cannot be cancelled on {}",
                reservation_id,
                reservation.status,
                reservation.check_in(),
                today
            )));
        }

        self.reservations
            .update_status(reservation_id, ReservationStatus::Cancelled)
            .await?;
        info!(reservation = %reservation_id, "Reservation cancelled");
        Ok(())
    }

    /// The actor's reservations, latest check-in first.
    pub async fn list_for_actor(&self, actor_id: ActorId) -> Result<Vec<Reservation>> {
        let mut reservations = self.reservations.find_by_actor(actor_id).await?;
        sort_by_check_in_desc(&mut reservations);
        Ok(reservations)
    }

    pub async fn list_for_hotel(&self, hotel_id: HotelId) -> Result<Vec<Reservation>> {
        let mut reservations = self.reservations.find_by_hotel(hotel_id).await?;
        sort_by_check_in_desc(&mut reservations);
        Ok(reservations)
    }

    pub async fn list_all(&self) -> Result<Vec<Reservation>> {
        let mut reservations = self.reservations.get_all().await?;
        sort_by_check_in_desc(&mut reservations);
        Ok(reservations)
    }

    /// A single reservation, visible only to its owner.
    pub async fn get(
        &self,
        reservation_id: ReservationId,
        actor_id: ActorId,
    ) -> Result<Reservation> {
        let reservation = self
            .reservations
            .get(reservation_id)
            .await?
            .ok_or_else(|| ReservationError::not_found("Reservation", reservation_id))?;
        if reservation.actor_id != actor_id {
            return Err(ReservationError::Forbidden {
                actor_id,
                reservation_id,
            });
        }
        Ok(reservation)
    }

    /// Server-side price of a stay in `room_id`.
    pub async fn quote(
        &self,
        room_id: RoomId,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<Amount> {
        let room = self
            .catalog
            .get_room(room_id)
            .await?
            .ok_or_else(|| ReservationError::not_found("Room", room_id))?;
        let dates = StayDates::new(check_in, check_out)?;
        pricing::price(room.category, room.base_price, dates.nights())
    }

    /// Joins a reservation with its hotel and room for display.
    pub async fn describe(&self, reservation: &Reservation) -> Result<ReservationView> {
        let hotel = self
            .catalog
            .get_hotel(reservation.hotel_id)
            .await?
            .ok_or_else(|| ReservationError::not_found("Hotel", reservation.hotel_id))?;
        let room = self
            .catalog
            .get_room(reservation.room_id)
            .await?
            .ok_or_else(|| ReservationError::not_found("Room", reservation.room_id))?;

        Ok(ReservationView {
            id: reservation.id,
            actor_id: reservation.actor_id,
            hotel_id: hotel.id,
            hotel_name: hotel.name,
            location: hotel.location,
            room_id: room.id,
            price_per_night: room.price_per_night()?,
            room_label: room.label,
            category: room.category,
            check_in: reservation.check_in(),
            check_out: reservation.check_out(),
            nights: reservation.nights(),
            guests: reservation.guests,
            note: reservation.note.clone(),
            total_price: reservation.total_price,
            status: reservation.status,
        })
    }

    fn resolve_price(
        &self,
        room: &Room,
        dates: &StayDates,
        quoted: Option<Amount>,
    ) -> Result<Amount> {
        let computed = pricing::price(room.category, room.base_price, dates.nights())?;
        let Some(quoted) = quoted else {
            return Ok(computed);
        };
        if quoted == computed {
            return Ok(quoted);
        }
        match self.price_policy {
            PricePolicy::Trust => {
                debug!(room = room.id, %quoted, %computed, "Accepting caller price");
                Ok(quoted)
            }
            PricePolicy::Verify => Err(ReservationError::InvalidRequest(format!(
                "quoted price {quoted} does not match computed price {computed}"
            ))),
        }
    }
}
