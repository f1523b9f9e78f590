use std::sync::Arc;

use chrono::NaiveDate;
use shared_config::ClinicConfig;
use uuid::Uuid;

use schedule_cell::models::{BookedSlot, CreateOverrideRequest, Doctor, SchedulePattern};
use schedule_cell::services::AvailabilityService;
use schedule_cell::store::{InMemoryOverrideStore, OverrideStore};

struct TestSetup {
    store: Arc<InMemoryOverrideStore>,
    service: AvailabilityService,
    mwf_doctor: Doctor,
    tth_doctor: Doctor,
}

impl TestSetup {
    fn new() -> Self {
        let store = Arc::new(InMemoryOverrideStore::new());
        let service = AvailabilityService::new(store.clone(), ClinicConfig::default());

        Self {
            store,
            service,
            mwf_doctor: doctor("Dr. Amelia Reyes", Some(SchedulePattern::Mwf)),
            tth_doctor: doctor("Dr. Ben Santos", Some(SchedulePattern::Tth)),
        }
    }

    fn roster(&self) -> Vec<Doctor> {
        vec![self.mwf_doctor.clone(), self.tth_doctor.clone()]
    }

    async fn add_override(&self, for_date: NaiveDate, assignee: Uuid, reason: &str) {
        self.store
            .create(CreateOverrideRequest {
                date: for_date,
                original_doctor_id: Some(self.mwf_doctor.id),
                assigned_doctor_id: assignee,
                reason: reason.to_string(),
            })
            .await
            .unwrap();
    }
}

fn doctor(name: &str, pattern: Option<SchedulePattern>) -> Doctor {
    Doctor {
        id: Uuid::new_v4(),
        full_name: name.to_string(),
        schedule_pattern: pattern,
        is_active: true,
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// 2024-01-01 is a Monday, 2024-01-02 a Tuesday.
fn monday() -> NaiveDate {
    date(2024, 1, 1)
}

fn tuesday() -> NaiveDate {
    date(2024, 1, 2)
}

#[tokio::test]
async fn pattern_resolves_the_on_duty_doctor_without_an_override() {
    let setup = TestSetup::new();
    let roster = setup.roster();

    let monday = setup
        .service
        .resolve_on_duty_doctor(&roster, monday())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(monday.id, setup.mwf_doctor.id);

    let tuesday = setup
        .service
        .resolve_on_duty_doctor(&roster, tuesday())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(tuesday.id, setup.tth_doctor.id);

    // 2024-01-07 is a Sunday: neither rotation covers it.
    let sunday = setup
        .service
        .resolve_on_duty_doctor(&roster, date(2024, 1, 7))
        .await
        .unwrap();
    assert!(sunday.is_none());
}

#[tokio::test]
async fn override_supersedes_the_pattern_and_clearing_it_restores_the_default() {
    let setup = TestSetup::new();
    let roster = setup.roster();
    let monday = monday();

    setup.add_override(monday, setup.tth_doctor.id, "sick leave").await;

    let resolved = setup
        .service
        .resolve_on_duty_doctor(&roster, monday)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(resolved.id, setup.tth_doctor.id);

    // The displaced doctor's stored pattern is untouched.
    assert_eq!(setup.mwf_doctor.schedule_pattern, Some(SchedulePattern::Mwf));

    setup.store.delete_by_date(monday).await.unwrap();
    let restored = setup
        .service
        .resolve_on_duty_doctor(&roster, monday)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(restored.id, setup.mwf_doctor.id);
}

#[tokio::test]
async fn override_wins_even_when_the_assignee_has_no_matching_pattern() {
    let setup = TestSetup::new();
    let unpatterned = doctor("Dr. Cara Ocampo", None);
    let mut roster = setup.roster();
    roster.push(unpatterned.clone());
    let monday = monday();

    setup.add_override(monday, unpatterned.id, "covering shift").await;

    let resolved = setup
        .service
        .resolve_on_duty_doctor(&roster, monday)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(resolved.id, unpatterned.id);
}

#[tokio::test]
async fn override_assigning_an_unknown_doctor_leaves_the_date_uncovered() {
    let setup = TestSetup::new();
    let roster = setup.roster();
    let monday = monday();

    setup.add_override(monday, Uuid::new_v4(), "locum booked").await;

    // No silent fall back to the pattern-derived doctor.
    let resolved = setup.service.resolve_on_duty_doctor(&roster, monday).await.unwrap();
    assert!(resolved.is_none());

    let slots = setup
        .service
        .generate_availability_slots(&roster, monday, monday, &[])
        .await
        .unwrap();
    assert!(slots.is_empty());
}

#[tokio::test]
async fn every_pattern_match_contributes_slots_independently() {
    let setup = TestSetup::new();
    let second_mwf = doctor("Dr. Dana Lim", Some(SchedulePattern::Mwf));
    let mut roster = setup.roster();
    roster.push(second_mwf.clone());
    let monday = monday();

    let on_duty = setup
        .service
        .resolve_on_duty_doctors(&roster, monday)
        .await
        .unwrap();
    assert_eq!(on_duty.len(), 2);
    assert_eq!(on_duty[0].id, setup.mwf_doctor.id);
    assert_eq!(on_duty[1].id, second_mwf.id);

    let slots = setup
        .service
        .generate_availability_slots(&roster, monday, monday, &[])
        .await
        .unwrap();
    // Nine booking hours each for the two on-duty doctors.
    assert_eq!(slots.len(), 18);
    assert!(slots.iter().filter(|s| s.doctor_id == second_mwf.id).count() == 9);
}

#[tokio::test]
async fn duty_day_expands_into_the_hourly_grid_without_lunch() {
    let setup = TestSetup::new();
    let roster = setup.roster();
    let monday = monday();

    let slots = setup
        .service
        .generate_availability_slots(&roster, monday, monday, &[])
        .await
        .unwrap();

    let times: Vec<&str> = slots.iter().map(|s| s.time.as_str()).collect();
    assert_eq!(
        times,
        vec!["08:00", "09:00", "10:00", "11:00", "13:00", "14:00", "15:00", "16:00", "17:00"]
    );
    assert!(slots.iter().all(|s| s.is_available));
    assert!(slots.iter().all(|s| s.doctor_id == setup.mwf_doctor.id));
    assert!(slots.iter().all(|s| s.schedule_pattern == Some(SchedulePattern::Mwf)));
}

#[tokio::test]
async fn a_booked_appointment_marks_exactly_its_own_slot() {
    let setup = TestSetup::new();
    let roster = setup.roster();
    let monday = monday();

    let booked = vec![
        BookedSlot {
            doctor_id: setup.mwf_doctor.id,
            date: "2024-01-01".to_string(),
            time: "10:00".to_string(),
        },
        // Different doctor at the same time must not leak onto the grid.
        BookedSlot {
            doctor_id: setup.tth_doctor.id,
            date: "2024-01-01".to_string(),
            time: "11:00".to_string(),
        },
    ];

    let slots = setup
        .service
        .generate_availability_slots(&roster, monday, monday, &booked)
        .await
        .unwrap();

    for slot in &slots {
        let expected = !(slot.time == "10:00");
        assert_eq!(slot.is_available, expected, "time {}", slot.time);
    }
}

#[tokio::test]
async fn malformed_booked_records_never_match_a_slot() {
    let setup = TestSetup::new();
    let roster = setup.roster();
    let monday = monday();

    let booked = vec![
        BookedSlot {
            doctor_id: setup.mwf_doctor.id,
            date: "01/01/2024".to_string(),
            time: "10:00".to_string(),
        },
        BookedSlot {
            doctor_id: setup.mwf_doctor.id,
            date: "2024-01-01".to_string(),
            time: "10am".to_string(),
        },
    ];

    let slots = setup
        .service
        .generate_availability_slots(&roster, monday, monday, &booked)
        .await
        .unwrap();

    assert!(slots.iter().all(|s| s.is_available));
}

#[tokio::test]
async fn grid_is_ordered_date_major_then_doctor_then_time() {
    let setup = TestSetup::new();
    let roster = setup.roster();
    let monday = monday();
    let tuesday = tuesday();

    let slots = setup
        .service
        .generate_availability_slots(&roster, monday, tuesday, &[])
        .await
        .unwrap();

    assert_eq!(slots.len(), 18);
    assert!(slots[..9].iter().all(|s| s.date == monday && s.doctor_id == setup.mwf_doctor.id));
    assert!(slots[9..].iter().all(|s| s.date == tuesday && s.doctor_id == setup.tth_doctor.id));
    assert!(slots[..9].windows(2).all(|pair| pair[0].time < pair[1].time));
}

#[tokio::test]
async fn empty_roster_yields_an_empty_grid_not_an_error() {
    let setup = TestSetup::new();
    let monday = monday();

    let slots = setup
        .service
        .generate_availability_slots(&[], monday, monday, &[])
        .await
        .unwrap();
    assert!(slots.is_empty());

    let blocks = setup
        .service
        .generate_doctor_schedule_blocks(&[], monday, monday, &[])
        .await
        .unwrap();
    assert!(blocks.is_empty());
}

#[tokio::test]
async fn inverted_range_yields_an_empty_grid() {
    let setup = TestSetup::new();
    let roster = setup.roster();

    let slots = setup
        .service
        .generate_availability_slots(
            &roster,
            date(2024, 1, 10),
            date(2024, 1, 5),
            &[],
        )
        .await
        .unwrap();
    assert!(slots.is_empty());
}

#[tokio::test]
async fn schedule_blocks_carry_per_day_appointment_counts() {
    let setup = TestSetup::new();
    let roster = setup.roster();
    let monday = monday();
    let wednesday = date(2024, 1, 3);

    let booked = vec![
        BookedSlot {
            doctor_id: setup.mwf_doctor.id,
            date: "2024-01-01".to_string(),
            time: "09:00".to_string(),
        },
        BookedSlot {
            doctor_id: setup.mwf_doctor.id,
            date: "2024-01-01".to_string(),
            time: "14:00".to_string(),
        },
        BookedSlot {
            doctor_id: setup.tth_doctor.id,
            date: "2024-01-02".to_string(),
            time: "08:00".to_string(),
        },
    ];

    let blocks = setup
        .service
        .generate_doctor_schedule_blocks(&roster, monday, wednesday, &booked)
        .await
        .unwrap();

    // Mon (MWF), Tue (TTH), Wed (MWF).
    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks[0].doctor_id, setup.mwf_doctor.id);
    assert_eq!(blocks[0].appointment_count, 2);
    assert_eq!(blocks[1].doctor_id, setup.tth_doctor.id);
    assert_eq!(blocks[1].appointment_count, 1);
    assert_eq!(blocks[2].doctor_id, setup.mwf_doctor.id);
    assert_eq!(blocks[2].appointment_count, 0);
}

#[tokio::test]
async fn overridden_date_shows_only_the_assignee_in_the_grid() {
    let setup = TestSetup::new();
    let roster = setup.roster();
    let monday = monday();

    setup.add_override(monday, setup.tth_doctor.id, "sick leave").await;

    let slots = setup
        .service
        .generate_availability_slots(&roster, monday, monday, &[])
        .await
        .unwrap();

    assert_eq!(slots.len(), 9);
    assert!(slots.iter().all(|s| s.doctor_id == setup.tth_doctor.id));
    assert!(slots.iter().all(|s| s.schedule_pattern == Some(SchedulePattern::Tth)));
}
