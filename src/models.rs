use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock::SlotTime;
use crate::placement::Window;

pub type SlotId = Uuid;
pub type TeamId = u32;
pub type PlayerId = u32;

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_days")]
    pub days: u8,
    #[serde(default)]
    pub timeline: TimelineConfig,
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub slots: Vec<GameSlot>,
}

fn default_days() -> u8 {
    5
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimelineConfig {
    pub start: SlotTime,
    pub end: SlotTime,
    /// Snap granularity in minutes
    pub grid: u32,
    /// Length of a freshly created slot in minutes
    pub default_duration: u32,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            start: SlotTime::from_minutes(17 * 60),
            end: SlotTime::from_minutes(28 * 60),
            grid: 15,
            default_duration: 60,
        }
    }
}

impl TimelineConfig {
    pub fn window(&self) -> Window {
        Window::new(self.start.minutes(), self.end.minutes())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub players: Vec<PlayerId>,
}

/// Teams and players known to a session.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    pub teams: Vec<Team>,
    pub players: Vec<Player>,
}

impl Roster {
    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_name(&self, id: PlayerId) -> String {
        self.player(id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| format!("#{id}"))
    }
}

/// Abstract scheduling day, counted from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Day(pub u8);

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A ground on a day: the resource two slots may not share at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ResourceKey {
    pub day: Day,
    pub ground: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub enum Sport {
    Football,
    Basketball,
    Volleyball,
    Chess,
    #[serde(rename = "Ping-Pong")]
    PingPong,
    Badminton,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SportKind {
    Team,
    Individual,
    Mixed,
}

impl Sport {
    pub const ALL: [Sport; 6] = [
        Sport::Football,
        Sport::Basketball,
        Sport::Volleyball,
        Sport::Chess,
        Sport::PingPong,
        Sport::Badminton,
    ];

    pub fn kind(self) -> SportKind {
        match self {
            Sport::Football | Sport::Basketball | Sport::Volleyball => SportKind::Team,
            Sport::Chess => SportKind::Individual,
            Sport::PingPong | Sport::Badminton => SportKind::Mixed,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Sport::Football => "Football",
            Sport::Basketball => "Basketball",
            Sport::Volleyball => "Volleyball",
            Sport::Chess => "Chess",
            Sport::PingPong => "Ping-Pong",
            Sport::Badminton => "Badminton",
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Sport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['-', ' ', '_'], "");
        Sport::ALL
            .into_iter()
            .find(|sport| sport.name().to_lowercase().replace('-', "") == wanted)
            .ok_or_else(|| format!("unknown sport '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Singles,
    Doubles,
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchType::Singles => f.write_str("singles"),
            MatchType::Doubles => f.write_str("doubles"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    A,
    B,
}

/// Who plays in a slot. The variant follows the sport's kind, and for mixed
/// sports also records whether the game is singles or doubles.
/// `None` marks a seat that has not been filled yet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Participants {
    Team {
        #[serde(default)]
        side_a: Option<TeamId>,
        #[serde(default)]
        side_b: Option<TeamId>,
    },
    Individual {
        #[serde(default)]
        side_a: Option<PlayerId>,
        #[serde(default)]
        side_b: Option<PlayerId>,
    },
    Singles {
        #[serde(default)]
        side_a: Option<PlayerId>,
        #[serde(default)]
        side_b: Option<PlayerId>,
    },
    Doubles {
        #[serde(default, deserialize_with = "deserialize_pair")]
        side_a: [Option<PlayerId>; 2],
        #[serde(default, deserialize_with = "deserialize_pair")]
        side_b: [Option<PlayerId>; 2],
    },
}

/// Accepts zero to two ids so schedule files can leave doubles seats out.
fn deserialize_pair<'de, D>(deserializer: D) -> Result<[Option<PlayerId>; 2], D::Error>
where
    D: Deserializer<'de>,
{
    let ids = Vec::<Option<PlayerId>>::deserialize(deserializer)?;
    if ids.len() > 2 {
        return Err(de::Error::invalid_length(ids.len(), &"at most two players"));
    }
    let mut pair = [None, None];
    for (seat, id) in pair.iter_mut().zip(ids) {
        *seat = id;
    }
    Ok(pair)
}

impl Participants {
    /// Empty shape for a new slot; mixed sports start out as singles.
    pub fn empty(kind: SportKind) -> Self {
        match kind {
            SportKind::Team => Participants::Team {
                side_a: None,
                side_b: None,
            },
            SportKind::Individual => Participants::Individual {
                side_a: None,
                side_b: None,
            },
            SportKind::Mixed => Self::empty_for_type(MatchType::Singles),
        }
    }

    pub fn empty_for_type(match_type: MatchType) -> Self {
        match match_type {
            MatchType::Singles => Participants::Singles {
                side_a: None,
                side_b: None,
            },
            MatchType::Doubles => Participants::Doubles {
                side_a: [None, None],
                side_b: [None, None],
            },
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Participants::Team { .. } => "team",
            Participants::Individual { .. } => "individual",
            Participants::Singles { .. } => "singles",
            Participants::Doubles { .. } => "doubles",
        }
    }

    pub fn fits(&self, kind: SportKind) -> bool {
        matches!(
            (self, kind),
            (Participants::Team { .. }, SportKind::Team)
                | (Participants::Individual { .. }, SportKind::Individual)
                | (Participants::Singles { .. }, SportKind::Mixed)
                | (Participants::Doubles { .. }, SportKind::Mixed)
        )
    }

    pub fn match_type(&self) -> Option<MatchType> {
        match self {
            Participants::Singles { .. } => Some(MatchType::Singles),
            Participants::Doubles { .. } => Some(MatchType::Doubles),
            _ => None,
        }
    }

    /// Mutable handle to one seat. `index` picks the partner in doubles and
    /// must be absent for every other shape.
    pub fn seat_mut(&mut self, side: Side, index: Option<usize>) -> Option<&mut Option<u32>> {
        match (self, index) {
            (
                Participants::Team { side_a, side_b }
                | Participants::Individual { side_a, side_b }
                | Participants::Singles { side_a, side_b },
                None,
            ) => Some(match side {
                Side::A => side_a,
                Side::B => side_b,
            }),
            (Participants::Doubles { side_a, side_b }, Some(i)) => match side {
                Side::A => side_a.get_mut(i),
                Side::B => side_b.get_mut(i),
            },
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GameSlot {
    #[serde(default = "Uuid::new_v4")]
    pub id: SlotId,
    pub day: Day,
    pub ground: u32,
    pub start: SlotTime,
    pub end: SlotTime,
    pub sport: Sport,
    pub participants: Participants,
}

impl GameSlot {
    pub fn resource(&self) -> ResourceKey {
        ResourceKey {
            day: self.day,
            ground: self.ground,
        }
    }

    pub fn span(&self) -> (u32, u32) {
        (self.start.minutes(), self.end.minutes())
    }

    pub fn duration(&self) -> u32 {
        self.end.minutes().saturating_sub(self.start.minutes())
    }

    pub fn match_type(&self) -> Option<MatchType> {
        self.participants.match_type()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} on Ground {} from {} to {}",
            self.sport, self.ground, self.start, self.end
        )
    }
}
