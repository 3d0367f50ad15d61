//! Text snapshot format for an entire port.
//!
//! # Layout
//!
//! A snapshot is newline-separated, with colon-separated fields inside a
//! line and comma-separated elements inside a list field:
//!
//! ```text
//! <name>
//! <time>
//! <cargo count>
//! BulkCargo:<id>:<destination>:<TYPE>:<tonnage>        (one per bulk load)
//! Container:<id>:<destination>:<TYPE>                  (one per container)
//! <ship count>
//! BulkCarrier:<imo>:<name>:<origin>:<FLAG>:<capacity>:<cargoId or empty>
//! ContainerShip:<imo>:<name>:<origin>:<FLAG>:<capacity>:<n>:<id,id,...>
//! <quay count>
//! BulkQuay:<id>:<imo or None>:<maxTonnage>
//! ContainerQuay:<id>:<imo or None>:<maxContainers>
//! ShipQueue:<n>:<imo,imo,...>
//! StoredCargo:<n>:<id,id,...>
//! Movements:<n>
//! ShipMovement:<time>:<DIRECTION>:<imo>                (one per movement)
//! CargoMovement:<time>:<DIRECTION>:<n>:<id,id,...>
//! Evaluators:<n>:<name,name,...>
//! ```
//!
//! Cargo, ships and quays appear in registration order, the queue and
//! warehouse in their own order, movements in action-time order (FIFO
//! within a minute). Decoding preserves those orders exactly, so
//! `encode(decode(s)) == s` for every snapshot this module accepts.
//!
//! # Referential integrity
//!
//! Sections are decoded in layout order, so every cross-reference points
//! backwards: ships may only name decoded cargo, quays and the queue only
//! decoded ships, and so on. A forward or dangling reference rejects the
//! whole snapshot. Evaluator lines carry only the evaluator's name; the
//! caller supplies an [`EvaluatorCatalog`] mapping names back to fresh
//! instances.

use crate::cargo::{BulkCargoType, Cargo, CargoKind, ContainerType};
use crate::evaluator::EvaluatorCatalog;
use crate::id::{CargoId, ImoNumber, QuayId, Ticks, Tonnes};
use crate::movement::{Movement, MovementDirection, MovementPayload};
use crate::port::Port;
use crate::quay::{Quay, QuayKind};
use crate::ship::{Hold, NauticalFlag, Ship};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a snapshot was rejected. Every variant carries the 1-based line
/// number where decoding stopped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("snapshot ended before the {0} section")]
    UnexpectedEnd(&'static str),
    #[error("line {line}: expected {expected} fields in {what}, found {found}")]
    FieldCount {
        line: usize,
        what: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: expected section header `{expected}`")]
    BadHeader { line: usize, expected: &'static str },
    #[error("line {line}: invalid number `{value}`")]
    InvalidNumber { line: usize, value: String },
    #[error("line {line}: {source}")]
    InvalidImo {
        line: usize,
        source: crate::id::InvalidImoNumber,
    },
    #[error("line {line}: unknown {what} `{value}`")]
    UnknownVariant {
        line: usize,
        what: &'static str,
        value: String,
    },
    #[error("line {line}: duplicate {what} id {value}")]
    Duplicate {
        line: usize,
        what: &'static str,
        value: u64,
    },
    #[error("line {line}: reference to unknown {what} {value}")]
    DanglingReference {
        line: usize,
        what: &'static str,
        value: u64,
    },
    #[error("line {line}: declared {what} count {declared} does not match {found} listed")]
    CountMismatch {
        line: usize,
        what: &'static str,
        declared: usize,
        found: usize,
    },
    #[error("line {line}: ship {imo} cannot be moored at quay {quay}")]
    IncompatibleBerth { line: usize, imo: u64, quay: u32 },
    #[error("line {0}: cargo movement moves no cargo")]
    EmptyCargoMovement(usize),
    #[error("line {line}: cargo {value} cannot be stowed in this hold")]
    BadStowage { line: usize, value: u32 },
    #[error("line {line}: {found} containers aboard a ship with capacity {capacity}")]
    HoldOverflow {
        line: usize,
        capacity: u32,
        found: usize,
    },
    #[error("unexpected trailing data at line {0}")]
    TrailingData(usize),
}

// ---------------------------------------------------------------------------
// Line cursor
// ---------------------------------------------------------------------------

/// Iterates snapshot lines while tracking the 1-based number of the line
/// most recently handed out, for error reporting.
struct Lines<'a> {
    inner: std::str::Lines<'a>,
    current: usize,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.lines(),
            current: 0,
        }
    }

    fn next(&mut self, section: &'static str) -> Result<&'a str, DecodeError> {
        match self.inner.next() {
            Some(line) => {
                self.current += 1;
                Ok(line)
            }
            None => Err(DecodeError::UnexpectedEnd(section)),
        }
    }

    fn line(&self) -> usize {
        self.current
    }

    fn finished(&mut self) -> Result<(), DecodeError> {
        match self.inner.next() {
            Some(_) => Err(DecodeError::TrailingData(self.current + 1)),
            None => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

fn split_fields<'a>(
    line: &'a str,
    line_no: usize,
    what: &'static str,
    expected: usize,
) -> Result<Vec<&'a str>, DecodeError> {
    let fields: Vec<&str> = line.split(':').collect();
    if fields.len() != expected {
        return Err(DecodeError::FieldCount {
            line: line_no,
            what,
            expected,
            found: fields.len(),
        });
    }
    Ok(fields)
}

fn parse_number<T: std::str::FromStr>(value: &str, line_no: usize) -> Result<T, DecodeError> {
    value.parse().map_err(|_| DecodeError::InvalidNumber {
        line: line_no,
        value: value.to_string(),
    })
}

fn parse_imo(value: &str, line_no: usize) -> Result<ImoNumber, DecodeError> {
    let raw: u64 = parse_number(value, line_no)?;
    ImoNumber::new(raw).map_err(|source| DecodeError::InvalidImo {
        line: line_no,
        source,
    })
}

/// Parse a `<count>:<comma,separated,list>` field pair, checking the count
/// against the actual element count. An empty list field means zero
/// elements.
fn parse_counted_list<'a>(
    count_field: &str,
    list_field: &'a str,
    line_no: usize,
    what: &'static str,
) -> Result<Vec<&'a str>, DecodeError> {
    let declared: usize = parse_number(count_field, line_no)?;
    let elements: Vec<&str> = if list_field.is_empty() {
        Vec::new()
    } else {
        list_field.split(',').collect()
    };
    if elements.len() != declared {
        return Err(DecodeError::CountMismatch {
            line: line_no,
            what,
            declared,
            found: elements.len(),
        });
    }
    Ok(elements)
}

fn join_ids<T: std::fmt::Display>(ids: impl IntoIterator<Item = T>) -> String {
    ids.into_iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

// ---------------------------------------------------------------------------
// Per-entity lines
// ---------------------------------------------------------------------------

fn encode_cargo(cargo: &Cargo) -> String {
    match cargo.kind() {
        CargoKind::Bulk { tonnage, variety } => format!(
            "BulkCargo:{}:{}:{}:{}",
            cargo.id(),
            cargo.destination(),
            variety.as_str(),
            tonnage
        ),
        CargoKind::Container { variety } => format!(
            "Container:{}:{}:{}",
            cargo.id(),
            cargo.destination(),
            variety.as_str()
        ),
    }
}

fn decode_cargo(line: &str, line_no: usize) -> Result<Cargo, DecodeError> {
    let tag = line.split(':').next().unwrap_or("");
    match tag {
        "BulkCargo" => {
            let fields = split_fields(line, line_no, "BulkCargo", 5)?;
            let id = CargoId(parse_number(fields[1], line_no)?);
            let variety =
                BulkCargoType::parse(fields[3]).ok_or_else(|| DecodeError::UnknownVariant {
                    line: line_no,
                    what: "bulk cargo type",
                    value: fields[3].to_string(),
                })?;
            let tonnage: Tonnes = parse_number(fields[4], line_no)?;
            Ok(Cargo::bulk(id, fields[2], tonnage, variety))
        }
        "Container" => {
            let fields = split_fields(line, line_no, "Container", 4)?;
            let id = CargoId(parse_number(fields[1], line_no)?);
            let variety =
                ContainerType::parse(fields[3]).ok_or_else(|| DecodeError::UnknownVariant {
                    line: line_no,
                    what: "container type",
                    value: fields[3].to_string(),
                })?;
            Ok(Cargo::container(id, fields[2], variety))
        }
        other => Err(DecodeError::UnknownVariant {
            line: line_no,
            what: "cargo tag",
            value: other.to_string(),
        }),
    }
}

fn encode_ship(ship: &Ship) -> String {
    let prefix = match ship.hold() {
        Hold::Bulk { .. } => "BulkCarrier",
        Hold::Container { .. } => "ContainerShip",
    };
    let head = format!(
        "{}:{}:{}:{}:{}",
        prefix,
        ship.imo(),
        ship.name(),
        ship.origin(),
        ship.flag().as_str()
    );
    match ship.hold() {
        Hold::Bulk { capacity, cargo } => {
            let carried = cargo.map(|id| id.to_string()).unwrap_or_default();
            format!("{head}:{capacity}:{carried}")
        }
        Hold::Container { capacity, aboard } => {
            format!("{head}:{capacity}:{}:{}", aboard.len(), join_ids(aboard.iter()))
        }
    }
}

fn decode_ship(line: &str, line_no: usize, port: &Port) -> Result<Ship, DecodeError> {
    let tag = line.split(':').next().unwrap_or("");
    // Aboard cargo must exist and match the hold's kind. The destination is
    // not checked: it only gates loading, not carrying.
    let check_stowage = |id: CargoId, wants_bulk: bool| -> Result<CargoId, DecodeError> {
        let Some(cargo) = port.cargo().get(id) else {
            return Err(DecodeError::DanglingReference {
                line: line_no,
                what: "cargo",
                value: u64::from(id.0),
            });
        };
        if cargo.is_bulk() == wants_bulk {
            Ok(id)
        } else {
            Err(DecodeError::BadStowage {
                line: line_no,
                value: id.0,
            })
        }
    };
    match tag {
        "BulkCarrier" => {
            let fields = split_fields(line, line_no, "BulkCarrier", 7)?;
            let (imo, flag) = decode_ship_head(&fields, line_no)?;
            let capacity: Tonnes = parse_number(fields[5], line_no)?;
            let mut ship = Ship::bulk_carrier(imo, fields[2], fields[3], flag, capacity);
            if !fields[6].is_empty() {
                let id = check_stowage(CargoId(parse_number(fields[6], line_no)?), true)?;
                ship.load(id);
            }
            Ok(ship)
        }
        "ContainerShip" => {
            let fields = split_fields(line, line_no, "ContainerShip", 8)?;
            let (imo, flag) = decode_ship_head(&fields, line_no)?;
            let capacity: u32 = parse_number(fields[5], line_no)?;
            let mut ship = Ship::container_ship(imo, fields[2], fields[3], flag, capacity);
            let aboard = parse_counted_list(fields[6], fields[7], line_no, "aboard container")?;
            if aboard.len() > capacity as usize {
                return Err(DecodeError::HoldOverflow {
                    line: line_no,
                    capacity,
                    found: aboard.len(),
                });
            }
            for raw in aboard {
                let id = check_stowage(CargoId(parse_number(raw, line_no)?), false)?;
                ship.load(id);
            }
            Ok(ship)
        }
        other => Err(DecodeError::UnknownVariant {
            line: line_no,
            what: "ship tag",
            value: other.to_string(),
        }),
    }
}

/// Imo and flag from the shared head of both ship line forms.
fn decode_ship_head(
    fields: &[&str],
    line_no: usize,
) -> Result<(ImoNumber, NauticalFlag), DecodeError> {
    let imo = parse_imo(fields[1], line_no)?;
    let flag = NauticalFlag::parse(fields[4]).ok_or_else(|| DecodeError::UnknownVariant {
        line: line_no,
        what: "nautical flag",
        value: fields[4].to_string(),
    })?;
    Ok((imo, flag))
}

fn encode_quay(quay: &Quay) -> String {
    let berth = match quay.berth() {
        Some(imo) => imo.to_string(),
        None => "None".to_string(),
    };
    match quay.kind() {
        QuayKind::Bulk { max_tonnage } => {
            format!("BulkQuay:{}:{berth}:{max_tonnage}", quay.id())
        }
        QuayKind::Container { max_containers } => {
            format!("ContainerQuay:{}:{berth}:{max_containers}", quay.id())
        }
    }
}

fn decode_quay(line: &str, line_no: usize, port: &Port) -> Result<Quay, DecodeError> {
    let fields = split_fields(line, line_no, "quay", 4)?;
    let id = QuayId(parse_number(fields[1], line_no)?);
    let mut quay = match fields[0] {
        "BulkQuay" => Quay::bulk(id, parse_number(fields[3], line_no)?),
        "ContainerQuay" => Quay::container(id, parse_number(fields[3], line_no)?),
        other => {
            return Err(DecodeError::UnknownVariant {
                line: line_no,
                what: "quay tag",
                value: other.to_string(),
            });
        }
    };
    if fields[2] != "None" {
        let imo = parse_imo(fields[2], line_no)?;
        let compatible = port
            .ships()
            .get(imo)
            .is_some_and(|ship| ship.can_dock(&quay, port.cargo()));
        if !compatible {
            return Err(DecodeError::IncompatibleBerth {
                line: line_no,
                imo: imo.get(),
                quay: id.0,
            });
        }
        quay.dock(imo);
    }
    Ok(quay)
}

fn encode_movement(movement: &Movement) -> String {
    let head = format!("{}:{}", movement.time(), movement.direction().as_str());
    match movement.payload() {
        MovementPayload::Ship(imo) => format!("ShipMovement:{head}:{imo}"),
        MovementPayload::Cargo(ids) => {
            format!("CargoMovement:{head}:{}:{}", ids.len(), join_ids(ids.iter()))
        }
    }
}

fn decode_movement(line: &str, line_no: usize, port: &Port) -> Result<Movement, DecodeError> {
    let tag = line.split(':').next().unwrap_or("");
    match tag {
        "ShipMovement" => {
            let fields = split_fields(line, line_no, "ShipMovement", 4)?;
            let (time, direction) = decode_movement_head(&fields, line_no)?;
            let imo = parse_imo(fields[3], line_no)?;
            if !port.ships().contains(imo) {
                return Err(DecodeError::DanglingReference {
                    line: line_no,
                    what: "ship",
                    value: imo.get(),
                });
            }
            Ok(Movement::ship(time, direction, imo))
        }
        "CargoMovement" => {
            let fields = split_fields(line, line_no, "CargoMovement", 5)?;
            let (time, direction) = decode_movement_head(&fields, line_no)?;
            let mut ids = Vec::new();
            for raw in parse_counted_list(fields[3], fields[4], line_no, "moved cargo")? {
                let id = CargoId(parse_number(raw, line_no)?);
                if !port.cargo().contains(id) {
                    return Err(DecodeError::DanglingReference {
                        line: line_no,
                        what: "cargo",
                        value: u64::from(id.0),
                    });
                }
                ids.push(id);
            }
            if ids.is_empty() {
                return Err(DecodeError::EmptyCargoMovement(line_no));
            }
            Ok(Movement::cargo(time, direction, ids))
        }
        other => Err(DecodeError::UnknownVariant {
            line: line_no,
            what: "movement tag",
            value: other.to_string(),
        }),
    }
}

fn decode_movement_head(
    fields: &[&str],
    line_no: usize,
) -> Result<(Ticks, MovementDirection), DecodeError> {
    let time: Ticks = parse_number(fields[1], line_no)?;
    let direction =
        MovementDirection::parse(fields[2]).ok_or_else(|| DecodeError::UnknownVariant {
            line: line_no,
            what: "movement direction",
            value: fields[2].to_string(),
        })?;
    Ok((time, direction))
}

// ---------------------------------------------------------------------------
// Whole-port snapshot
// ---------------------------------------------------------------------------

impl Port {
    /// Render the complete simulation state as a text snapshot.
    pub fn encode(&self) -> String {
        let mut out = Vec::new();
        out.push(self.name.clone());
        out.push(self.time.to_string());

        out.push(self.cargo.len().to_string());
        out.extend(self.cargo.iter().map(encode_cargo));

        out.push(self.ships.len().to_string());
        out.extend(self.ships.iter().map(encode_ship));

        out.push(self.quays.len().to_string());
        out.extend(self.quays.iter().map(encode_quay));

        out.push(format!(
            "ShipQueue:{}:{}",
            self.queue.len(),
            join_ids(self.queue.ships().iter())
        ));
        out.push(format!(
            "StoredCargo:{}:{}",
            self.warehouse.len(),
            join_ids(self.warehouse.iter())
        ));

        out.push(format!("Movements:{}", self.pending_movement_count()));
        out.extend(self.pending_movements().map(encode_movement));

        let names: Vec<&str> = self.evaluators.iter().map(|e| e.name()).collect();
        out.push(format!("Evaluators:{}:{}", names.len(), names.join(",")));

        out.join("\n")
    }

    /// Rebuild a port from a text snapshot.
    ///
    /// Evaluator lines are resolved through `catalog`; rebuilt evaluators
    /// start with fresh internal state. Any malformed line, dangling
    /// reference or unknown evaluator name rejects the whole snapshot.
    pub fn decode(snapshot: &str, catalog: &EvaluatorCatalog) -> Result<Self, DecodeError> {
        let mut lines = Lines::new(snapshot);

        let name = lines.next("name")?;
        let time_line = lines.next("time")?;
        let mut port = Port::new(name);
        port.time = parse_number(time_line, lines.line())?;

        // Cargo, then ships, then quays: each section may only reference
        // the ones before it.
        let cargo_count: usize = parse_number(lines.next("cargo count")?, lines.line())?;
        for _ in 0..cargo_count {
            let cargo = decode_cargo(lines.next("cargo")?, lines.line())?;
            let raw = u64::from(cargo.id().0);
            port.cargo.register(cargo).map_err(|_| DecodeError::Duplicate {
                line: lines.line(),
                what: "cargo",
                value: raw,
            })?;
        }

        let ship_count: usize = parse_number(lines.next("ship count")?, lines.line())?;
        for _ in 0..ship_count {
            let ship = decode_ship(lines.next("ship")?, lines.line(), &port)?;
            let raw = ship.imo().get();
            port.ships.register(ship).map_err(|_| DecodeError::Duplicate {
                line: lines.line(),
                what: "ship",
                value: raw,
            })?;
        }

        let quay_count: usize = parse_number(lines.next("quay count")?, lines.line())?;
        for _ in 0..quay_count {
            let quay = decode_quay(lines.next("quay")?, lines.line(), &port)?;
            port.quays.push(quay);
        }

        let queue_line = lines.next("ShipQueue")?;
        let fields = split_fields(queue_line, lines.line(), "ShipQueue", 3)?;
        expect_header(fields[0], "ShipQueue", lines.line())?;
        for raw in parse_counted_list(fields[1], fields[2], lines.line(), "queued ship")? {
            let imo = parse_imo(raw, lines.line())?;
            if !port.ships.contains(imo) {
                return Err(DecodeError::DanglingReference {
                    line: lines.line(),
                    what: "ship",
                    value: imo.get(),
                });
            }
            port.queue.push(imo);
        }

        let stored_line = lines.next("StoredCargo")?;
        let fields = split_fields(stored_line, lines.line(), "StoredCargo", 3)?;
        expect_header(fields[0], "StoredCargo", lines.line())?;
        for raw in parse_counted_list(fields[1], fields[2], lines.line(), "stored cargo")? {
            let id = CargoId(parse_number(raw, lines.line())?);
            if !port.cargo.contains(id) {
                return Err(DecodeError::DanglingReference {
                    line: lines.line(),
                    what: "cargo",
                    value: u64::from(id.0),
                });
            }
            port.warehouse.push(id);
        }

        let movements_line = lines.next("Movements")?;
        let fields = split_fields(movements_line, lines.line(), "Movements", 2)?;
        expect_header(fields[0], "Movements", lines.line())?;
        let movement_count: usize = parse_number(fields[1], lines.line())?;
        for _ in 0..movement_count {
            let movement = decode_movement(lines.next("movement")?, lines.line(), &port)?;
            // Movements dated before the snapshot time are kept as encoded;
            // they will never fire again, matching the state that was saved.
            port.restore_movement(movement);
        }

        let eval_line = lines.next("Evaluators")?;
        let fields = split_fields(eval_line, lines.line(), "Evaluators", 3)?;
        expect_header(fields[0], "Evaluators", lines.line())?;
        for name in parse_counted_list(fields[1], fields[2], lines.line(), "evaluator")? {
            let evaluator = catalog.build(name).ok_or_else(|| DecodeError::UnknownVariant {
                line: lines.line(),
                what: "evaluator",
                value: name.to_string(),
            })?;
            port.register_evaluator(evaluator);
        }

        lines.finished()?;
        Ok(port)
    }
}

fn expect_header(found: &str, expected: &'static str, line_no: usize) -> Result<(), DecodeError> {
    if found == expected {
        Ok(())
    } else {
        Err(DecodeError::BadHeader {
            line: line_no,
            expected,
        })
    }
}
