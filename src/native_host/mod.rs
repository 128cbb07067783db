//! Native messaging host for the Daily Life browser dashboard.
//!
//! Each message is a 4-byte little-endian length followed by that many bytes
//! of UTF-8 JSON, in both directions. Every request gets exactly one response.

use crate::aggregate::{MonthlyProgress, TrackerView};
use crate::constants::MAX_NATIVE_MESSAGE_SIZE;
use crate::dates::parse_date;
use crate::models::{EnrichedGoal, HabitDefinition, HabitDefinitionPatch, HabitDraft, NewHabitDefinition};
use crate::storage::KeyValueStore;
use crate::tracker::HabitTracker;
use crate::validation::ValidationReport;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::io::{self, Read, Write};

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum IncomingMessage {
    GetActiveHabits,
    GetInactiveHabits,
    AddHabit {
        habit: NewHabitDefinition,
    },
    UpdateHabit {
        id: String,
        patch: HabitDefinitionPatch,
    },
    DeleteHabit {
        id: String,
    },
    RestoreHabit {
        id: String,
    },
    ValidateHabit {
        draft: HabitDraft,
    },
    SubmitHabit {
        draft: HabitDraft,
        #[serde(default)]
        editing_id: Option<String>,
    },
    GetTrackedHabits {
        #[serde(default)]
        year_month: Option<String>,
    },
    GetAvailableHabits {
        #[serde(default)]
        year_month: Option<String>,
    },
    EnrollHabit {
        habit_def_id: String,
    },
    UnenrollHabit {
        goal_id: String,
    },
    ToggleDaily {
        goal_id: String,
    },
    Increment {
        goal_id: String,
    },
    Decrement {
        goal_id: String,
    },
    /// A null date clears the selection.
    SelectDate {
        #[serde(default)]
        date: Option<String>,
    },
    GetMonthlyProgress {
        goal_id: String,
        habit_def_id: String,
        year_month: String,
    },
    GetTrackerView,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum OutgoingMessage {
    Habits { habits: Vec<HabitDefinition> },
    TrackedHabits { goals: Vec<EnrichedGoal> },
    Ack { success: bool },
    Validation(ValidationReport),
    MonthlyProgress { progress: Option<MonthlyProgress> },
    TrackerView { view: Option<TrackerView> },
    Error { message: String },
}

/// One frame off the wire: a request, or the reason it could not be read.
enum Frame {
    Message(IncomingMessage),
    Rejected(String),
}

pub struct NativeHost<S: KeyValueStore> {
    tracker: HabitTracker<S>,
}

impl<S: KeyValueStore> NativeHost<S> {
    pub fn new(tracker: HabitTracker<S>) -> Self {
        Self { tracker }
    }

    pub fn tracker(&self) -> &HabitTracker<S> {
        &self.tracker
    }

    /// Serve requests until the reader closes.
    pub fn run<R: Read, W: Write>(&mut self, mut reader: R, mut writer: W) -> io::Result<()> {
        while let Some(frame) = read_frame(&mut reader)? {
            let response = match frame {
                Frame::Message(message) => self.handle_message(message),
                Frame::Rejected(message) => {
                    warn!("Rejected native message: {message}");
                    OutgoingMessage::Error { message }
                }
            };
            write_message(&mut writer, &response)?;
        }
        debug!("Native messaging connection closed");
        Ok(())
    }

    pub fn handle_message(&mut self, message: IncomingMessage) -> OutgoingMessage {
        let tracker = &mut self.tracker;
        match message {
            IncomingMessage::GetActiveHabits => OutgoingMessage::Habits {
                habits: tracker.get_active_habit_definitions(),
            },
            IncomingMessage::GetInactiveHabits => OutgoingMessage::Habits {
                habits: tracker.get_inactive_habit_definitions(),
            },
            IncomingMessage::AddHabit { habit } => ack(tracker.add_habit_definition(habit)),
            IncomingMessage::UpdateHabit { id, patch } => ack(tracker.update_habit_definition(&id, patch)),
            IncomingMessage::DeleteHabit { id } => ack(tracker.delete_habit_definition(&id)),
            IncomingMessage::RestoreHabit { id } => ack(tracker.restore_habit_definition(&id)),
            IncomingMessage::ValidateHabit { draft } => {
                OutgoingMessage::Validation(tracker.validate_habit_definition(&draft))
            }
            IncomingMessage::SubmitHabit { draft, editing_id } => {
                let errors = tracker
                    .submit_habit_definition(&draft, editing_id.as_deref())
                    .err()
                    .unwrap_or_default();
                OutgoingMessage::Validation(ValidationReport {
                    is_valid: errors.is_empty(),
                    errors,
                })
            }
            IncomingMessage::GetTrackedHabits { year_month } => OutgoingMessage::TrackedHabits {
                goals: tracker.get_tracked_habit_definitions(year_month.as_deref()),
            },
            IncomingMessage::GetAvailableHabits { year_month } => OutgoingMessage::Habits {
                habits: tracker.get_available_habit_definitions(year_month.as_deref()),
            },
            IncomingMessage::EnrollHabit { habit_def_id } => ack(tracker.enroll_habit(&habit_def_id)),
            IncomingMessage::UnenrollHabit { goal_id } => ack(tracker.unenroll_habit(&goal_id)),
            IncomingMessage::ToggleDaily { goal_id } => ack(tracker.toggle_daily_habit(&goal_id)),
            IncomingMessage::Increment { goal_id } => ack(tracker.increment_habit(&goal_id)),
            IncomingMessage::Decrement { goal_id } => ack(tracker.decrement_habit(&goal_id)),
            IncomingMessage::SelectDate { date } => match date.as_deref().map(parse_date).transpose() {
                Ok(date) => {
                    tracker.select_date(date);
                    ack(true)
                }
                Err(e) => OutgoingMessage::Error {
                    message: e.to_string(),
                },
            },
            IncomingMessage::GetMonthlyProgress {
                goal_id,
                habit_def_id,
                year_month,
            } => OutgoingMessage::MonthlyProgress {
                progress: tracker.get_monthly_progress(&goal_id, &habit_def_id, &year_month),
            },
            IncomingMessage::GetTrackerView => OutgoingMessage::TrackerView {
                view: tracker.get_tracker_view(),
            },
        }
    }
}

fn ack(success: bool) -> OutgoingMessage {
    OutgoingMessage::Ack { success }
}

/// Read one frame. Returns None once the reader is closed between frames.
fn read_frame<R: Read>(reader: &mut R) -> io::Result<Option<Frame>> {
    let mut len_bytes = [0u8; 4];
    match reader.read_exact(&mut len_bytes) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e),
    }
    let raw_len = u32::from_le_bytes(len_bytes);
    let len = usize::try_from(raw_len).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    if len > MAX_NATIVE_MESSAGE_SIZE {
        // Skip the body so the stream stays aligned on frame boundaries
        let skipped = io::copy(&mut reader.by_ref().take(u64::from(raw_len)), &mut io::sink())?;
        if skipped < u64::from(raw_len) {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "truncated message body"));
        }
        return Ok(Some(Frame::Rejected(format!(
            "Message too large: {len} bytes (max: {MAX_NATIVE_MESSAGE_SIZE} bytes)"
        ))));
    }

    let mut buffer = vec![0u8; len];
    reader.read_exact(&mut buffer)?;

    Ok(Some(match serde_json::from_slice(&buffer) {
        Ok(message) => Frame::Message(message),
        Err(e) => Frame::Rejected(format!("Invalid message: {e}")),
    }))
}

fn write_message<W: Write>(writer: &mut W, message: &OutgoingMessage) -> io::Result<()> {
    let json = serde_json::to_vec(message)?;
    let len = u32::try_from(json.len()).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    writer.write_all(&len.to_le_bytes())?;
    writer.write_all(&json)?;
    writer.flush()
}
