//! The keyword and pattern rule table that classifies requirement text.
//!
//! [`Analysis::of`] extracts everything the synthesizer needs from a
//! requirement statement: numeric bounds, adjacent subsystems, hardware
//! interfaces, usability phrases and special cases. [`Scenario`] is the
//! outcome of applying the policy to an analysis; each scenario becomes one
//! test case.

use std::{fmt, sync::LazyLock};

use regex::Regex;

use crate::domain::{Methodology, TestLevel};

static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\w.])(\d+(?:\.\d+)?)(?:\s*(%|°[CcFf]|[A-Za-z]+\b))?")
        .expect("number pattern is valid")
});

static INTERFACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(GPIO\s*P?\d+(?:\.\d+)?|GPIO|U?S?ART\d*|ADC\d*|PWM\d*|I2C|SPI|CAN)\b")
        .expect("interface pattern is valid")
});

static SENSOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:([a-z0-9-]+)\s+)?sensors?\b").expect("sensor pattern is valid")
});

static SUBSYSTEMS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"\b(?:lcd|oled|display|screen)s?\b", "display unit"),
        (r"\b(?:barrier|boom|gate)s?\b", "barrier gate"),
        (r"\b(?:cameras?|anpr)\b", "camera"),
        (r"\brfid\b", "RFID reader"),
        (r"\b(?:database|db)\b", "database"),
        (r"\b(?:server|backend|cloud)\b", "central server"),
        (r"\b(?:keypad|keyboard)\b", "keypad"),
        (r"\b(?:buzzer|siren)\b", "buzzer"),
        (r"\b(?:leds?|indicator)\b", "LED indicator"),
        (r"\b(?:motors?|actuators?)\b", "motor driver"),
        (r"\b(?:gsm|sms|modem)\b", "GSM modem"),
        (r"\b(?:payment|wallet|account|balance)\b", "payment module"),
        (r"\b(?:uart|serial)\b", "UART link"),
        (r"\bgpio\b", "GPIO interface"),
        (r"\b(?:network|wi-?fi|ethernet)\b", "network interface"),
        (r"\b(?:printer|receipt)\b", "receipt printer"),
        (r"\b(?:microcontroller|controller|mcu)\b", "controller"),
    ]
    .into_iter()
    .map(|(pattern, name)| {
        let regex = Regex::new(&format!("(?i){pattern}")).expect("subsystem pattern is valid");
        (regex, name)
    })
    .collect()
});

static USABILITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(user[- ]friendly|intuitive|easy to (?:use|read|understand|operate)|readable|legible|clearly (?:visible|displayed)|accessible|understandable)\b",
    )
    .expect("usability pattern is valid")
});

static EXEMPT_CATEGORY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(government|emergency|ambulances?|police|military|diplomatic|vip|exempt(?:ed)?)(?:\s+(vehicles?|cars?|users?|cards?|accounts?))?\b",
    )
    .expect("exempt category pattern is valid")
});

static ZERO_CHARGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:(?:zero|no|free|waived|nil)\s+(?:toll\s+)?(?:charges?|tolls?|fees?|fares?|costs?|payments?)|free of charge|toll[- ]free|exempt(?:ed)?\s+from)\b",
    )
    .expect("zero charge pattern is valid")
});

const RESOURCES: &str = "balance|funds?|credit|battery|power|memory|storage|stock|fuel|signal";

static INSUFFICIENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:insufficient|inadequate|low|not enough|negative)\s+({RESOURCES})\b|\b({RESOURCES})\s+is\s+(?:insufficient|inadequate|too low|not sufficient)\b"
    ))
    .expect("insufficient pattern is valid")
});

static REPLENISH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:recharg|top[- ]?up|replenish|reload|refill)\w*")
        .expect("replenish pattern is valid")
});

static ZERO_CHARGE_SUBJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:(?:the|all|any|every|each)\s+)?(.+?)\s+(?:shall|must|should|will|can|may|are|is)\b",
    )
    .expect("zero charge subject pattern is valid")
});

/// Subjects that name the system itself rather than who is charged.
const SYSTEM_NOUNS: &[&str] = &[
    "system", "controller", "device", "application", "software", "plaza", "unit",
];

static RESOURCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b({RESOURCES})\b")).expect("resource pattern is valid")
});

static OBLIGATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:shall|must|should|will|is required to|needs? to|if|when|whenever|unless|upon|once)\b",
    )
    .expect("obligation pattern is valid")
});

const SENSOR_STOPWORDS: &[&str] = &[
    "the", "a", "an", "each", "every", "any", "all", "using", "by", "via", "with", "on", "from",
    "of", "and", "or", "its", "their", "to", "in",
];

const COUNT_NOUNS: &[&str] = &[
    "times", "time", "attempts", "attempt", "retries", "retry", "characters", "character",
    "digits", "digit", "vehicles", "vehicle", "users", "user", "transactions", "transaction",
    "messages", "message", "requests", "request", "records", "record", "entries", "entry",
    "cards", "card", "lanes", "lane", "packets", "packet", "frames", "frame", "items", "item",
    "readings", "reading", "samples", "sample", "connections", "connection", "sessions",
    "session", "cycles", "cycle", "bits", "bit", "bytes", "byte",
];

/// `(aliases, symbol, spaced, attribute)`
const UNITS: &[(&[&str], &str, bool, Attribute)] = &[
    (&["ms", "msec", "msecs", "millisecond", "milliseconds"], "ms", false, Attribute::Timing),
    (&["s", "sec", "secs", "second", "seconds"], "s", false, Attribute::Timing),
    (&["min", "mins", "minute", "minutes"], "min", false, Attribute::Timing),
    (&["h", "hr", "hrs", "hour", "hours"], "h", false, Attribute::Timing),
    (&["%", "percent"], "%", false, Attribute::Proportion),
    (&["bps"], "bps", true, Attribute::Throughput),
    (&["kbps"], "kbps", true, Attribute::Throughput),
    (&["mbps"], "Mbps", true, Attribute::Throughput),
    (&["baud"], "baud", true, Attribute::Throughput),
    (&["kb"], "KB", true, Attribute::Capacity),
    (&["mb"], "MB", true, Attribute::Capacity),
    (&["gb"], "GB", true, Attribute::Capacity),
    (&["v", "volt", "volts"], "V", false, Attribute::Physical),
    (&["mv"], "mV", false, Attribute::Physical),
    (&["ma"], "mA", false, Attribute::Physical),
    (&["hz"], "Hz", false, Attribute::Physical),
    (&["khz"], "kHz", false, Attribute::Physical),
    (&["mhz"], "MHz", false, Attribute::Physical),
    (&["w", "watt", "watts"], "W", false, Attribute::Physical),
    (&["°c", "degrees"], "°C", false, Attribute::Physical),
    (&["cm"], "cm", false, Attribute::Physical),
    (&["mm"], "mm", false, Attribute::Physical),
    (&["m", "metre", "metres", "meter", "meters"], "m", false, Attribute::Physical),
    (&["km"], "km", false, Attribute::Physical),
    (&["kg"], "kg", false, Attribute::Physical),
];

/// Direction phrases, checked in order. Negated forms come before the forms
/// they contain.
const DIRECTIONS: &[(&str, Direction)] = &[
    ("not exceed", Direction::AtMost),
    ("no more than", Direction::AtMost),
    ("not more than", Direction::AtMost),
    ("no less than", Direction::AtLeast),
    ("not less than", Direction::AtLeast),
    ("no fewer than", Direction::AtLeast),
    ("within", Direction::AtMost),
    ("at most", Direction::AtMost),
    ("up to", Direction::AtMost),
    ("maximum", Direction::AtMost),
    ("max", Direction::AtMost),
    ("less than", Direction::Under),
    ("fewer than", Direction::Under),
    ("under", Direction::Under),
    ("below", Direction::Under),
    ("limited to", Direction::AtMost),
    ("at least", Direction::AtLeast),
    ("minimum", Direction::AtLeast),
    ("more than", Direction::Over),
    ("greater than", Direction::Over),
    ("above", Direction::Over),
    ("exceed", Direction::Over),
];

/// The quality a numeric bound measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// A time limit.
    Timing,
    /// A success, availability or accuracy percentage.
    Reliability,
    /// Any other percentage.
    Proportion,
    /// A count or size.
    Capacity,
    /// A data rate.
    Throughput,
    /// An electrical or physical quantity.
    Physical,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Timing => "response time",
            Self::Reliability => "reliability",
            Self::Proportion => "proportion",
            Self::Capacity => "capacity",
            Self::Throughput => "throughput",
            Self::Physical => "physical limit",
        })
    }
}

/// Which side of a bound is acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Values up to and including the bound are acceptable.
    AtMost,
    /// Values from the bound upwards are acceptable.
    AtLeast,
    /// Only values strictly below the bound are acceptable.
    Under,
    /// Only values strictly above the bound are acceptable.
    Over,
    /// Only the bound itself is acceptable.
    Exactly,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::AtMost => "at most",
            Self::AtLeast => "at least",
            Self::Under => "less than",
            Self::Over => "more than",
            Self::Exactly => "exactly",
        })
    }
}

/// A unit of measure attached to a bound.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Unit {
    symbol: String,
    spaced: bool,
    attribute: Attribute,
}

impl Unit {
    fn lookup(word: &str) -> Option<Self> {
        let lower = word.to_lowercase();
        UNITS
            .iter()
            .find(|(aliases, ..)| aliases.contains(&lower.as_str()))
            .map(|&(_, symbol, spaced, attribute)| Self {
                symbol: symbol.to_string(),
                spaced,
                attribute,
            })
            .or_else(|| {
                COUNT_NOUNS.contains(&lower.as_str()).then(|| Self {
                    symbol: lower,
                    spaced: true,
                    attribute: Attribute::Capacity,
                })
            })
    }
}

/// Where a boundary point lies relative to its bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Position {
    /// One step below the bound.
    Below,
    /// The bound itself.
    At,
    /// One step above the bound.
    Above,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Below => "just below",
            Self::At => "exactly at",
            Self::Above => "just above",
        })
    }
}

/// A concrete boundary-value test input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoundaryPoint {
    /// Position relative to the bound.
    pub position: Position,
    /// The formatted value, e.g. `11s`.
    pub value: String,
    /// Whether the system should accept this value.
    pub accepted: bool,
}

/// A numeric limit mentioned in a requirement.
///
/// The value is held as a scaled integer (`99.9` is `999` at scale `1`), so
/// that boundary points step by the smallest written decimal unit without
/// floating point rounding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bound {
    mantissa: u64,
    scale: u32,
    unit: Option<Unit>,
    direction: Direction,
    attribute: Attribute,
}

impl Bound {
    /// Which side of the bound is acceptable.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// The quality this bound measures.
    #[must_use]
    pub const fn attribute(&self) -> Attribute {
        self.attribute
    }

    /// The bound itself, formatted with its unit (e.g. `10s`).
    #[must_use]
    pub fn limit(&self) -> String {
        self.format(self.mantissa)
    }

    /// The meaningful boundary points: one step below, at, and one step
    /// above the bound.
    ///
    /// Points below zero, and percentages above 100, are omitted.
    #[must_use]
    pub fn points(&self) -> Vec<BoundaryPoint> {
        let ceiling = self
            .unit
            .as_ref()
            .filter(|unit| unit.symbol == "%")
            .and_then(|_| 10u64.checked_pow(self.scale)?.checked_mul(100));

        [
            (Position::Below, self.mantissa.checked_sub(1)),
            (Position::At, Some(self.mantissa)),
            (Position::Above, self.mantissa.checked_add(1)),
        ]
        .into_iter()
        .filter_map(|(position, mantissa)| {
            let mantissa = mantissa.filter(|m| ceiling.is_none_or(|c| *m <= c))?;
            Some(BoundaryPoint {
                position,
                value: self.format(mantissa),
                accepted: self.accepts(position),
            })
        })
        .collect()
    }

    /// Whether a value at `position` satisfies the bound.
    #[must_use]
    pub const fn accepts(&self, position: Position) -> bool {
        matches!(
            (self.direction, position),
            (
                Direction::AtMost | Direction::AtLeast | Direction::Exactly,
                Position::At
            ) | (Direction::AtMost | Direction::Under, Position::Below)
                | (Direction::AtLeast | Direction::Over, Position::Above)
        )
    }

    fn format(&self, mantissa: u64) -> String {
        let number = match 10u64.checked_pow(self.scale) {
            Some(1) | None => mantissa.to_string(),
            Some(divisor) => format!(
                "{}.{:0width$}",
                mantissa / divisor,
                mantissa % divisor,
                width = self.scale as usize
            ),
        };

        match &self.unit {
            None => number,
            Some(unit) if unit.spaced => format!("{number} {}", unit.symbol),
            Some(unit) => format!("{number}{}", unit.symbol),
        }
    }

    fn same_value(&self, other: &Self) -> bool {
        self.mantissa == other.mantissa && self.scale == other.scale && self.unit == other.unit
    }
}

/// Everything the rule table extracts from one requirement statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    /// Distinct numeric bounds, in order of mention.
    pub bounds: Vec<Bound>,
    /// Adjacent subsystems, in order of first mention.
    pub subsystems: Vec<String>,
    /// Hardware interfaces such as `GPIO P0.7`, in order of mention.
    pub interfaces: Vec<String>,
    /// Distinct usability phrases.
    pub usability: Vec<String>,
    /// Who receives a zero charge, if anyone: the exempt category when one
    /// is named, otherwise the subject of the statement.
    pub zero_charge: Option<String>,
    /// The resource whose shortage the requirement handles, if any.
    pub insufficient: Option<String>,
    /// The resource the requirement replenishes, if any.
    pub replenishes: Option<String>,
    /// Whether the statement contains an obligation, condition or bound.
    pub testable: bool,
}

impl Analysis {
    /// Applies the rule table to a requirement statement.
    #[must_use]
    pub fn of(text: &str) -> Self {
        let bounds = bounds(text);
        let testable = OBLIGATION.is_match(text) || !bounds.is_empty();

        Self {
            bounds,
            subsystems: subsystems(text),
            interfaces: distinct(INTERFACE.find_iter(text).map(|m| m.as_str().to_string())),
            usability: distinct(
                USABILITY
                    .find_iter(text)
                    .map(|m| m.as_str().to_lowercase()),
            ),
            zero_charge: zero_charge(text),
            insufficient: INSUFFICIENT.captures(text).and_then(|captures| {
                captures
                    .get(1)
                    .or_else(|| captures.get(2))
                    .map(|m| m.as_str().to_lowercase())
            }),
            replenishes: replenishes(text),
            testable,
        }
    }

    /// The first bound, if any.
    #[must_use]
    pub fn primary_bound(&self) -> Option<&Bound> {
        self.bounds.first()
    }
}

fn bounds(text: &str) -> Vec<Bound> {
    let mut bounds: Vec<Bound> = Vec::new();

    for captures in NUMBER.captures_iter(text) {
        let Some(number) = captures.get(1) else {
            continue;
        };
        let unit = captures.get(2).and_then(|m| Unit::lookup(m.as_str()));
        let direction = direction(&text[..number.start()]);

        if unit.is_none() && direction == Direction::Exactly {
            continue;
        }

        let Some((mantissa, scale)) = scaled(number.as_str()) else {
            continue;
        };

        let attribute = match &unit {
            Some(unit) if unit.attribute == Attribute::Proportion && mentions_reliability(text) => {
                Attribute::Reliability
            }
            Some(unit) => unit.attribute,
            None => Attribute::Capacity,
        };

        let bound = Bound {
            mantissa,
            scale,
            unit,
            direction,
            attribute,
        };
        if !bounds.iter().any(|existing| existing.same_value(&bound)) {
            bounds.push(bound);
        }
    }

    bounds
}

/// Splits a decimal into a mantissa and scale.
///
/// Returns `None` if the number does not fit, or has more decimals than a
/// percentage ceiling at that scale can represent.
fn scaled(number: &str) -> Option<(u64, u32)> {
    let (mantissa, scale) = match number.split_once('.') {
        None => (number.parse().ok()?, 0),
        Some((whole, fraction)) => (
            format!("{whole}{fraction}").parse().ok()?,
            u32::try_from(fraction.len()).ok()?,
        ),
    };
    10u64
        .checked_pow(scale)?
        .checked_mul(100)
        .map(|_| (mantissa, scale))
}

/// The direction implied by the last few words before a number.
fn direction(preceding: &str) -> Direction {
    let words: Vec<&str> = preceding.split_whitespace().collect();
    let window = words[words.len().saturating_sub(3)..]
        .join(" ")
        .to_lowercase();

    DIRECTIONS
        .iter()
        .find(|(phrase, _)| window.contains(phrase))
        .map_or(Direction::Exactly, |&(_, direction)| direction)
}

fn mentions_reliability(text: &str) -> bool {
    let lower = text.to_lowercase();
    ["reliab", "availab", "uptime", "accura", "success"]
        .iter()
        .any(|stem| lower.contains(stem))
}

fn subsystems(text: &str) -> Vec<String> {
    let mut found: Vec<(usize, String)> = Vec::new();

    if let Some(captures) = SENSOR.captures(text) {
        let start = captures.get(0).map_or(0, |m| m.start());
        let name = captures
            .get(1)
            .map(|m| m.as_str())
            .filter(|qualifier| !SENSOR_STOPWORDS.contains(&qualifier.to_lowercase().as_str()))
            .map_or_else(|| "sensor".to_string(), |qualifier| format!("{qualifier} sensor"));
        found.push((start, name));
    }

    for (regex, name) in SUBSYSTEMS.iter() {
        if let Some(m) = regex.find(text) {
            found.push((m.start(), (*name).to_string()));
        }
    }

    found.sort_by_key(|(start, _)| *start);
    distinct(found.into_iter().map(|(_, name)| name))
}

fn zero_charge(text: &str) -> Option<String> {
    if !ZERO_CHARGE.is_match(text) {
        return None;
    }

    if let Some(captures) = EXEMPT_CATEGORY.captures(text) {
        let category = captures[1].to_lowercase();
        return Some(captures.get(2).map_or_else(
            || format!("{category} users"),
            |noun| format!("{category} {}", noun.as_str().to_lowercase()),
        ));
    }

    let subject = ZERO_CHARGE_SUBJECT
        .captures(text)
        .map(|captures| captures[1].to_lowercase())
        .filter(|subject| {
            !subject
                .split_whitespace()
                .any(|word| SYSTEM_NOUNS.contains(&word))
        });
    Some(subject.unwrap_or_else(|| "exempt users".to_string()))
}

/// The resource a requirement replenishes.
///
/// `recharge` and `top up` refer to an account balance unless another
/// resource is named; other verbs need an explicit resource.
fn replenishes(text: &str) -> Option<String> {
    let verb = REPLENISH.find(text)?.as_str().to_lowercase();
    RESOURCE
        .captures(text)
        .map(|captures| captures[1].to_lowercase())
        .or_else(|| {
            (verb.starts_with("recharg") || verb.starts_with("top"))
                .then(|| "balance".to_string())
        })
}

fn distinct(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

/// One class of test derived from a requirement.
///
/// Each scenario fixes the testing level and methodology of the test case it
/// becomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scenario {
    /// The requirement exercised end to end under nominal conditions.
    NormalPath {
        /// The first hardware interface mentioned, if any.
        interface: Option<String>,
        /// The resource replenished, if this is a recharge-style requirement.
        replenishes: Option<String>,
    },
    /// Interaction between the component and an adjacent subsystem.
    Interaction {
        /// The subsystem exercised, or `None` for the dependent modules in
        /// general.
        subsystem: Option<String>,
    },
    /// Boundary handling of a numeric bound at unit level.
    UnitBoundary {
        /// The bound under test.
        bound: Bound,
    },
    /// Valid and invalid input classes at unit level.
    UnitPartition {
        /// The interface whose input is partitioned, if any.
        interface: Option<String>,
    },
    /// One boundary point of a measurable attribute.
    MeasuredPoint {
        /// The bound under test.
        bound: Bound,
        /// The point exercised.
        point: BoundaryPoint,
    },
    /// A usability constraint assessed by a tester.
    Usability {
        /// The usability phrase, e.g. `user-friendly`.
        aspect: String,
    },
    /// A quality requirement with no measurable attribute.
    Qualitative,
    /// A communication or resource limit is respected under normal load.
    LimitCompliance {
        /// The stated limit, if numeric.
        bound: Option<Bound>,
    },
    /// Behaviour exactly at a communication or resource limit.
    LimitEdge {
        /// The stated limit, if numeric.
        bound: Option<Bound>,
    },
    /// An exempt category is charged nothing.
    ZeroCharge {
        /// The exempt category, e.g. `government vehicles`.
        subject: String,
    },
    /// A resource shortage is handled.
    Insufficient {
        /// The resource, e.g. `balance`.
        resource: String,
    },
}

impl Scenario {
    /// The testing level of the resulting test case.
    #[must_use]
    pub const fn level(&self) -> TestLevel {
        match self {
            Self::UnitBoundary { .. } | Self::UnitPartition { .. } | Self::LimitEdge { .. } => {
                TestLevel::Unit
            }
            Self::Interaction { .. } => TestLevel::Integration,
            Self::NormalPath { .. }
            | Self::MeasuredPoint { .. }
            | Self::Usability { .. }
            | Self::Qualitative
            | Self::LimitCompliance { .. }
            | Self::ZeroCharge { .. }
            | Self::Insufficient { .. } => TestLevel::Validation,
        }
    }

    /// The design methodology of the resulting test case.
    #[must_use]
    pub const fn methodology(&self) -> Methodology {
        match self {
            Self::NormalPath { .. }
            | Self::Interaction { .. }
            | Self::Qualitative
            | Self::LimitCompliance { .. } => Methodology::BlackBox,
            Self::UnitBoundary { .. }
            | Self::MeasuredPoint { .. }
            | Self::LimitEdge { .. }
            | Self::Insufficient { .. } => Methodology::BoundaryValue,
            Self::UnitPartition { .. } | Self::ZeroCharge { .. } => {
                Methodology::EquivalencePartitioning
            }
            Self::Usability { .. } => Methodology::ExploratoryAdHoc,
        }
    }

    /// The test inputs (conditions and values).
    #[must_use]
    pub fn inputs(&self) -> String {
        match self {
            Self::NormalPath {
                replenishes: Some(resource),
                ..
            } => format!("Account with insufficient {resource}; valid recharge request"),
            Self::NormalPath {
                interface: Some(interface),
                ..
            } => format!("Valid signal on {interface}"),
            Self::NormalPath { .. } | Self::Qualitative => "Nominal operating inputs".to_string(),
            Self::Interaction {
                subsystem: Some(subsystem),
            } => format!("Stimulus exchanged with the {subsystem}"),
            Self::Interaction { subsystem: None } => {
                "Stimulus exchanged with the dependent modules".to_string()
            }
            Self::UnitBoundary { bound } => bound
                .points()
                .into_iter()
                .map(|point| point.value)
                .collect::<Vec<_>>()
                .join(", "),
            Self::UnitPartition {
                interface: Some(interface),
            } => format!("{interface} asserted (valid class); {interface} idle (invalid class)"),
            Self::UnitPartition { interface: None } => {
                "Valid input (valid class); missing or corrupt input (invalid class)".to_string()
            }
            Self::MeasuredPoint { point, .. } => point.value.clone(),
            Self::Usability { .. } => "Representative user performing the task".to_string(),
            Self::LimitCompliance { bound: Some(bound) } => {
                format!("Load below the limit of {}", bound.limit())
            }
            Self::LimitCompliance { bound: None } => {
                "Load below the stated limit".to_string()
            }
            Self::LimitEdge { bound: Some(bound) } => bound.limit(),
            Self::LimitEdge { bound: None } => "Load exactly at the stated limit".to_string(),
            Self::ZeroCharge { subject } => format!("{subject} (exempt category)"),
            Self::Insufficient { resource } => {
                format!("Available {resource} one unit below the required amount")
            }
        }
    }
}
