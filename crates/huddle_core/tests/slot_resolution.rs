use huddle_core::db::open_db_in_memory;
use huddle_core::{
    AvailabilityWindow, Event, EventId, EventRepository, EventService, EventSlot, EventUpdate,
    FixedClock, RepoError, RepoResult, ResolveError, SlotResolution, SqliteEventRepository,
    SqliteUserRepository, TieBreak, User, UserId, UserRepository,
};
use rusqlite::Connection;
use std::cell::Cell;
use std::rc::Rc;
use uuid::Uuid;

const JAN_1_2026: i64 = 1_767_225_600;

fn at(hours: i64, minutes: i64) -> i64 {
    JAN_1_2026 + hours * 3600 + minutes * 60
}

fn seed_user(conn: &Connection, name: &str, windows: &[AvailabilityWindow]) -> User {
    let repo = SqliteUserRepository::try_new(conn).unwrap();
    let user = User::new(name, format!("{}@example.com", name.to_lowercase()));
    repo.create_user(&user).unwrap();
    repo.replace_availability(user.id, windows).unwrap();
    user
}

fn seed_event(conn: &Connection, duration_hours: i64, slots: Vec<EventSlot>) -> Event {
    let organizer = seed_user(conn, "Olive", &[]);
    let repo = SqliteEventRepository::try_new(conn).unwrap();
    let mut event = Event::new("sprint planning", duration_hours, organizer.id, slots);
    event.created_at = at(7, 0);
    repo.create_event(&event).unwrap();
    event
}

/// Counts availability queries issued through the wrapped repository.
struct CountingUserRepo<'conn> {
    inner: SqliteUserRepository<'conn>,
    availability_calls: Rc<Cell<usize>>,
}

impl<'conn> CountingUserRepo<'conn> {
    fn new(conn: &'conn Connection) -> (Self, Rc<Cell<usize>>) {
        let availability_calls = Rc::new(Cell::new(0));
        let repo = Self {
            inner: SqliteUserRepository::try_new(conn).unwrap(),
            availability_calls: Rc::clone(&availability_calls),
        };
        (repo, availability_calls)
    }
}

impl UserRepository for CountingUserRepo<'_> {
    fn create_user(&self, user: &User) -> RepoResult<UserId> {
        self.inner.create_user(user)
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        self.inner.get_user(id)
    }

    fn list_users(&self) -> RepoResult<Vec<User>> {
        self.inner.list_users()
    }

    fn list_availability(&self, user_id: UserId) -> RepoResult<Vec<AvailabilityWindow>> {
        self.inner.list_availability(user_id)
    }

    fn replace_availability(
        &self,
        user_id: UserId,
        windows: &[AvailabilityWindow],
    ) -> RepoResult<()> {
        self.inner.replace_availability(user_id, windows)
    }

    fn clear_availability(&self, user_id: UserId) -> RepoResult<()> {
        self.inner.clear_availability(user_id)
    }

    fn users_available_for(
        &self,
        target: &EventSlot,
        min_duration_hours: i64,
    ) -> RepoResult<Vec<User>> {
        self.availability_calls.set(self.availability_calls.get() + 1);
        self.inner.users_available_for(target, min_duration_hours)
    }
}

fn service_with_counter(
    conn: &Connection,
) -> (
    EventService<SqliteEventRepository<'_>, CountingUserRepo<'_>, FixedClock>,
    Rc<Cell<usize>>,
) {
    let events = SqliteEventRepository::try_new(conn).unwrap();
    let (users, calls) = CountingUserRepo::new(conn);
    (
        EventService::with_clock(events, users, FixedClock { epoch_s: at(7, 0) }),
        calls,
    )
}

fn partition_check(resolution: &SlotResolution, population: &[User]) {
    assert_eq!(
        resolution.attendees.len() + resolution.non_attendees.len(),
        population.len()
    );
    for user in population {
        let attends = resolution.attendees.contains(user);
        let misses = resolution.non_attendees.contains(user);
        assert!(attends != misses, "user {} must be on exactly one side", user.name);
    }
}

#[test]
fn scenario_one_hour_event_excludes_exact_span_window() {
    let conn = open_db_in_memory().unwrap();
    // U1 has 80 minutes around the first slot; U2 has exactly the slot.
    let u1 = seed_user(
        &conn,
        "Ada",
        &[AvailabilityWindow::new(at(8, 50), at(10, 10))],
    );
    let u2 = seed_user(
        &conn,
        "Bob",
        &[AvailabilityWindow::new(at(9, 0), at(10, 0))],
    );

    let repo = SqliteEventRepository::try_new(&conn).unwrap();
    let mut event = Event::new(
        "sprint planning",
        1,
        u1.id,
        vec![
            EventSlot::new(at(9, 0), at(10, 0)),
            EventSlot::new(at(11, 0), at(12, 0)),
        ],
    );
    event.created_at = at(7, 0);
    repo.create_event(&event).unwrap();

    let (service, _) = service_with_counter(&conn);
    let resolution = service.resolve_possible_slot(event.id).unwrap().unwrap();

    assert_eq!(resolution.slot, EventSlot::new(at(9, 0), at(10, 0)));
    assert_eq!(resolution.attendees, vec![u1.clone()]);
    assert_eq!(resolution.non_attendees, vec![u2.clone()]);

    let population = service_population(&conn);
    partition_check(&resolution, &population);
}

#[test]
fn scenario_single_slot_everyone_available_early_exits() {
    let conn = open_db_in_memory().unwrap();
    let all_day = [AvailabilityWindow::new(at(6, 0), at(20, 0))];
    let ada = seed_user(&conn, "Ada", &all_day);
    seed_user(&conn, "Bob", &all_day);
    seed_user(&conn, "Charlie", &all_day);

    let repo = SqliteEventRepository::try_new(&conn).unwrap();
    let mut event = Event::new(
        "sprint planning",
        2,
        ada.id,
        vec![EventSlot::new(at(9, 0), at(11, 0))],
    );
    event.created_at = at(7, 0);
    repo.create_event(&event).unwrap();

    let (service, calls) = service_with_counter(&conn);
    let resolution = service.resolve_possible_slot(event.id).unwrap().unwrap();

    assert_eq!(calls.get(), 1);
    assert_eq!(resolution.slot, EventSlot::new(at(9, 0), at(11, 0)));
    assert_eq!(resolution.attendees.len(), 3);
    assert!(resolution.non_attendees.is_empty());
}

#[test]
fn full_population_slot_skips_remaining_queries() {
    let conn = open_db_in_memory().unwrap();
    let all_day = [AvailabilityWindow::new(at(6, 0), at(20, 0))];
    let users: Vec<User> = ["Ada", "Bob", "Charlie"]
        .iter()
        .map(|name| seed_user(&conn, name, &all_day))
        .collect();

    // Organizer must also be available or the early exit cannot trigger.
    let organizer = seed_user(&conn, "Olive", &all_day);
    let repo = SqliteEventRepository::try_new(&conn).unwrap();
    let mut event = Event::new(
        "sprint planning",
        2,
        organizer.id,
        vec![
            EventSlot::new(at(9, 0), at(11, 0)),
            EventSlot::new(at(13, 0), at(15, 0)),
            EventSlot::new(at(16, 0), at(18, 0)),
        ],
    );
    event.created_at = at(7, 0);
    repo.create_event(&event).unwrap();

    let (service, calls) = service_with_counter(&conn);
    let resolution = service.resolve_possible_slot(event.id).unwrap().unwrap();

    assert_eq!(calls.get(), 1);
    assert_eq!(resolution.slot, EventSlot::new(at(9, 0), at(11, 0)));
    assert_eq!(resolution.attendees.len(), users.len() + 1);
    assert!(resolution.non_attendees.is_empty());
}

#[test]
fn scenario_no_overlapping_availability_yields_absent() {
    let conn = open_db_in_memory().unwrap();
    seed_user(
        &conn,
        "Ada",
        &[AvailabilityWindow::new(at(13, 0), at(15, 0))],
    );
    let event = seed_event(&conn, 1, vec![EventSlot::new(at(9, 0), at(10, 0))]);

    let (service, calls) = service_with_counter(&conn);
    assert!(service.resolve_possible_slot(event.id).unwrap().is_none());
    assert_eq!(calls.get(), 1);
}

#[test]
fn all_zero_attendance_across_slots_yields_absent() {
    let conn = open_db_in_memory().unwrap();
    seed_user(&conn, "Ada", &[]);
    let event = seed_event(
        &conn,
        1,
        vec![
            EventSlot::new(at(9, 0), at(10, 0)),
            EventSlot::new(at(11, 0), at(12, 0)),
            EventSlot::new(at(14, 0), at(15, 0)),
        ],
    );

    let (service, calls) = service_with_counter(&conn);
    assert!(service.resolve_possible_slot(event.id).unwrap().is_none());
    assert_eq!(calls.get(), 3);
}

#[test]
fn absent_event_yields_absent_without_queries() {
    let conn = open_db_in_memory().unwrap();
    let (service, calls) = service_with_counter(&conn);

    assert!(service.resolve_possible_slot(Uuid::new_v4()).unwrap().is_none());
    assert_eq!(calls.get(), 0);
}

#[test]
fn event_without_slots_yields_absent_without_queries() {
    let conn = open_db_in_memory().unwrap();
    let event = seed_event(&conn, 1, Vec::new());

    let (service, calls) = service_with_counter(&conn);
    assert!(service.resolve_possible_slot(event.id).unwrap().is_none());
    assert_eq!(calls.get(), 0);
}

#[test]
fn tied_slots_resolve_to_the_later_one() {
    let conn = open_db_in_memory().unwrap();
    // Ada qualifies for both slots; the counts tie at one.
    seed_user(
        &conn,
        "Ada",
        &[AvailabilityWindow::new(at(8, 0), at(18, 0))],
    );
    let event = seed_event(
        &conn,
        1,
        vec![
            EventSlot::new(at(9, 0), at(10, 0)),
            EventSlot::new(at(11, 0), at(12, 0)),
        ],
    );

    let (service, _) = service_with_counter(&conn);
    let resolution = service.resolve_possible_slot(event.id).unwrap().unwrap();
    assert_eq!(resolution.slot, EventSlot::new(at(11, 0), at(12, 0)));
}

#[test]
fn prefer_earliest_policy_resolves_ties_to_the_first_slot() {
    let conn = open_db_in_memory().unwrap();
    seed_user(
        &conn,
        "Ada",
        &[AvailabilityWindow::new(at(8, 0), at(18, 0))],
    );
    let event = seed_event(
        &conn,
        1,
        vec![
            EventSlot::new(at(9, 0), at(10, 0)),
            EventSlot::new(at(11, 0), at(12, 0)),
        ],
    );

    let (mut service, _) = service_with_counter(&conn);
    service.set_tie_break(TieBreak::PreferEarliest);
    let resolution = service.resolve_possible_slot(event.id).unwrap().unwrap();
    assert_eq!(resolution.slot, EventSlot::new(at(9, 0), at(10, 0)));
}

#[test]
fn better_attended_later_slot_beats_earlier_winner() {
    let conn = open_db_in_memory().unwrap();
    seed_user(
        &conn,
        "Ada",
        &[AvailabilityWindow::new(at(8, 0), at(18, 0))],
    );
    seed_user(
        &conn,
        "Bob",
        &[AvailabilityWindow::new(at(10, 30), at(18, 0))],
    );
    let event = seed_event(
        &conn,
        1,
        vec![
            EventSlot::new(at(9, 0), at(10, 0)),
            EventSlot::new(at(11, 0), at(12, 0)),
        ],
    );

    let (service, _) = service_with_counter(&conn);
    let resolution = service.resolve_possible_slot(event.id).unwrap().unwrap();

    assert_eq!(resolution.slot, EventSlot::new(at(11, 0), at(12, 0)));
    assert_eq!(resolution.attendees.len(), 2);
}

#[test]
fn empty_population_resolves_to_first_slot_with_empty_sides() {
    // No users at all: the zero count equals the population size, so the
    // early exit returns the first slot instead of suppressing it.
    let stub_events = StubEventRepo {
        event: Some(plain_event(vec![
            EventSlot::new(at(9, 0), at(10, 0)),
            EventSlot::new(at(11, 0), at(12, 0)),
        ])),
        fail_get: false,
    };
    let service = EventService::with_clock(
        stub_events,
        StubUserRepo::default(),
        FixedClock { epoch_s: at(7, 0) },
    );

    let resolution = service.resolve_possible_slot(Uuid::new_v4()).unwrap().unwrap();
    assert_eq!(resolution.slot, EventSlot::new(at(9, 0), at(10, 0)));
    assert!(resolution.attendees.is_empty());
    assert!(resolution.non_attendees.is_empty());
}

#[test]
fn store_failures_are_tagged_with_their_phase() {
    let slots = vec![EventSlot::new(at(9, 0), at(10, 0))];

    let fail_event = EventService::with_clock(
        StubEventRepo {
            event: None,
            fail_get: true,
        },
        StubUserRepo::default(),
        FixedClock { epoch_s: at(7, 0) },
    );
    assert!(matches!(
        fail_event.resolve_possible_slot(Uuid::new_v4()),
        Err(ResolveError::FetchEvent(_))
    ));

    let fail_population = EventService::with_clock(
        StubEventRepo {
            event: Some(plain_event(slots.clone())),
            fail_get: false,
        },
        StubUserRepo {
            fail_population: true,
            ..StubUserRepo::default()
        },
        FixedClock { epoch_s: at(7, 0) },
    );
    assert!(matches!(
        fail_population.resolve_possible_slot(Uuid::new_v4()),
        Err(ResolveError::FetchPopulation(_))
    ));

    let fail_availability = EventService::with_clock(
        StubEventRepo {
            event: Some(plain_event(slots)),
            fail_get: false,
        },
        StubUserRepo {
            fail_availability: true,
            ..StubUserRepo::default()
        },
        FixedClock { epoch_s: at(7, 0) },
    );
    assert!(matches!(
        fail_availability.resolve_possible_slot(Uuid::new_v4()),
        Err(ResolveError::FetchAvailability { slot_index: 0, .. })
    ));
}

fn service_population(conn: &Connection) -> Vec<User> {
    SqliteUserRepository::try_new(conn).unwrap().list_users().unwrap()
}

fn plain_event(slots: Vec<EventSlot>) -> Event {
    let mut event = Event::new("sprint planning", 1, Uuid::new_v4(), slots);
    event.created_at = at(7, 0);
    event
}

/// Event store stub for phase-failure and edge-case tests.
struct StubEventRepo {
    event: Option<Event>,
    fail_get: bool,
}

impl EventRepository for StubEventRepo {
    fn create_event(&self, event: &Event) -> RepoResult<EventId> {
        Ok(event.id)
    }

    fn update_event(&self, _update: &EventUpdate) -> RepoResult<()> {
        Ok(())
    }

    fn get_event(&self, _id: EventId) -> RepoResult<Option<Event>> {
        if self.fail_get {
            return Err(RepoError::InvalidData("event store offline".to_string()));
        }
        Ok(self.event.clone())
    }

    fn list_events(&self) -> RepoResult<Vec<Event>> {
        Ok(self.event.clone().into_iter().collect())
    }

    fn delete_event(&self, _id: EventId) -> RepoResult<()> {
        Ok(())
    }
}

/// User store stub with switchable failures and an empty population.
#[derive(Default)]
struct StubUserRepo {
    fail_population: bool,
    fail_availability: bool,
}

impl UserRepository for StubUserRepo {
    fn create_user(&self, user: &User) -> RepoResult<UserId> {
        Ok(user.id)
    }

    fn get_user(&self, _id: UserId) -> RepoResult<Option<User>> {
        Ok(None)
    }

    fn list_users(&self) -> RepoResult<Vec<User>> {
        if self.fail_population {
            return Err(RepoError::InvalidData("user store offline".to_string()));
        }
        Ok(Vec::new())
    }

    fn list_availability(&self, _user_id: UserId) -> RepoResult<Vec<AvailabilityWindow>> {
        Ok(Vec::new())
    }

    fn replace_availability(
        &self,
        _user_id: UserId,
        _windows: &[AvailabilityWindow],
    ) -> RepoResult<()> {
        Ok(())
    }

    fn clear_availability(&self, _user_id: UserId) -> RepoResult<()> {
        Ok(())
    }

    fn users_available_for(
        &self,
        _target: &EventSlot,
        _min_duration_hours: i64,
    ) -> RepoResult<Vec<User>> {
        if self.fail_availability {
            return Err(RepoError::InvalidData(
                "availability query offline".to_string(),
            ));
        }
        Ok(Vec::new())
    }
}
