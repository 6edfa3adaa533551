//! A tiny stand-in cockpit for exercising the router from the command line.

use std::error::Error;
use std::fmt;

use detent::prelude::*;

/// Free-turning knob
struct HeadingBug {
    degrees: f64,
}

impl RotaryControl for HeadingBug {
    fn angle(&self) -> f64 {
        self.degrees
    }

    fn set_angle(&mut self, degrees: f64) {
        self.degrees = degrees;
    }
}

impl RoutableControl for HeadingBug {
    fn as_rotary(&self) -> Option<&dyn RotaryControl> {
        Some(self)
    }

    fn as_rotary_mut(&mut self) -> Option<&mut dyn RotaryControl> {
        Some(self)
    }
}

/// Knob with hard stops at 0 and 360
struct CourseKnob {
    degrees: f64,
}

impl RotaryControl for CourseKnob {
    fn angle(&self) -> f64 {
        self.degrees
    }

    fn set_angle(&mut self, degrees: f64) {
        self.degrees = degrees.clamp(0.0, 360.0);
    }
}

impl RoutableControl for CourseKnob {
    fn as_rotary(&self) -> Option<&dyn RotaryControl> {
        Some(self)
    }

    fn as_rotary_mut(&mut self) -> Option<&mut dyn RotaryControl> {
        Some(self)
    }
}

/// Eight detented positions, 45 degrees apart
struct NavSource {
    position: i32,
}

impl NavSource {
    const POSITIONS: i32 = 8;
    const DEGREES_PER_POSITION: f64 = 45.0;
}

impl RotaryControl for NavSource {
    fn angle(&self) -> f64 {
        self.position as f64 * Self::DEGREES_PER_POSITION
    }

    fn set_angle(&mut self, degrees: f64) {
        let position = (degrees / Self::DEGREES_PER_POSITION).round() as i32;
        self.position = position.clamp(0, Self::POSITIONS - 1);
    }

    fn is_rotary_switch(&self) -> bool {
        true
    }
}

impl PulsedControl for NavSource {
    fn pulse(&mut self, count: i32) {
        self.position = (self.position + count).clamp(0, Self::POSITIONS - 1);
    }
}

impl RoutableControl for NavSource {
    fn as_rotary(&self) -> Option<&dyn RotaryControl> {
        Some(self)
    }

    fn as_rotary_mut(&mut self) -> Option<&mut dyn RotaryControl> {
        Some(self)
    }

    fn as_pulsed_mut(&mut self) -> Option<&mut dyn PulsedControl> {
        Some(self)
    }

    fn as_pulsed(&self) -> Option<&dyn PulsedControl> {
        Some(self)
    }
}

/// Altimeter setting in hundredths of inHg
struct BaroSet {
    hundredths: i32,
}

impl PulsedControl for BaroSet {
    fn pulse(&mut self, count: i32) {
        self.hundredths += count;
        info!("Baro Set: {:.2} inHg", self.hundredths as f64 / 100.0);
    }
}

impl RoutableControl for BaroSet {
    fn as_pulsed_mut(&mut self) -> Option<&mut dyn PulsedControl> {
        Some(self)
    }

    fn as_pulsed(&self) -> Option<&dyn PulsedControl> {
        Some(self)
    }
}

struct PanelLight;

impl RoutableControl for PanelLight {}

pub fn cockpit() -> ControlRegistry {
    let mut registry = ControlRegistry::new();
    registry.insert("Heading Bug", HeadingBug { degrees: 0.0 });
    registry.insert("Course Knob", CourseKnob { degrees: 180.0 });
    registry.insert("Nav Source", NavSource { position: 0 });
    registry.insert("Baro Set", BaroSet { hundredths: 2992 });
    registry.insert("Panel Light", PanelLight);
    registry
}

/// One line of a simulation script
#[derive(Debug, PartialEq)]
pub enum Step {
    Select(String),
    Pulses(String, f64),
    Angle(String, f64),
    Move(String, f64),
    Remove(String),
    Reset,
    Status,
}

#[derive(Debug)]
pub struct ScriptError {
    line: usize,
    message: String,
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl Error for ScriptError {}

/// Splits on whitespace, keeping double-quoted runs together so that names
/// like `"Heading Bug"` survive
fn tokenize(line: &str) -> Result<Vec<String>, String> {
    let mut tokens = vec![];
    let mut current = String::new();
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => quoted = !quoted,
            c if c.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }

    if quoted {
        return Err("unterminated quote".to_string());
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    Ok(tokens)
}

fn parse_line(line: &str) -> Result<Option<Step>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let tokens = tokenize(line)?;
    let number = |s: &&str| {
        s.parse::<f64>()
            .map_err(|_| format!("`{}` is not a number", s))
    };

    let words: Vec<&str> = tokens.iter().map(String::as_str).collect();

    let step = match words.as_slice() {
        ["select", name] => Step::Select(name.to_string()),
        ["pulses", port, n] => Step::Pulses(port.to_string(), number(n)?),
        ["angle", port, v] => Step::Angle(port.to_string(), number(v)?),
        ["move", name, d] => Step::Move(name.to_string(), number(d)?),
        ["remove", name] => Step::Remove(name.to_string()),
        ["reset"] => Step::Reset,
        ["status"] => Step::Status,
        _ => return Err(format!("unrecognized command `{}`", line)),
    };

    Ok(Some(step))
}

pub fn parse_script(script: &str) -> Result<Vec<Step>, ScriptError> {
    script
        .lines()
        .enumerate()
        .filter_map(|(i, line)| match parse_line(line) {
            Ok(step) => step.map(Ok),
            Err(message) => Some(Err(ScriptError {
                line: i + 1,
                message,
            })),
        })
        .collect()
}

fn control_id(
    registry: &ControlRegistry,
    name: &str,
) -> Result<ControlId, Box<dyn Error>> {
    registry
        .find(name)
        .ok_or_else(|| format!("No control named `{}`", name).into())
}

pub fn run_step(
    step: &Step,
    router: &mut Router,
    registry: &mut ControlRegistry,
) -> Result<(), Box<dyn Error>> {
    match step {
        Step::Select(name) => {
            let id = control_id(registry, name)?;
            router.record_selection(id, name);
        }
        Step::Pulses(port, n) => router.value_from_pulses(port, *n, registry)?,
        Step::Angle(port, v) => router.relative_angle(port, *v, registry)?,
        Step::Move(name, degrees) => {
            let id = control_id(registry, name)?;
            if let Some(rotary) = registry
                .control_mut(id)
                .and_then(|control| control.as_rotary_mut())
            {
                rotary.set_angle(*degrees);
            } else {
                warn!("`{}` is not rotary; ignoring move", name);
            }
        }
        Step::Remove(name) => {
            let id = control_id(registry, name)?;
            registry.remove(id);
        }
        Step::Reset => router.reset(),
        Step::Status => print_status(router, registry),
    }
    Ok(())
}

pub fn print_status(router: &Router, registry: &ControlRegistry) {
    println!("  most recent: {:?}", router.most_recent_control());
    println!("  unclaimed:   {:?}", router.unclaimed_control());

    for port in router.ports().iter() {
        println!(
            "  {:<12} bound: {:?}",
            port.name(),
            port.bound_control(registry)
        );
    }

    for name in [
        "Heading Bug",
        "Course Knob",
        "Nav Source",
        "Baro Set",
        "Panel Light",
    ] {
        let Some(entry) = registry.find(name).and_then(|id| registry.get(id))
        else {
            continue;
        };
        match entry.control.as_rotary() {
            Some(rotary) => println!("  {:<12} {:.2}°", name, rotary.angle()),
            None => println!("  {:<12} -", name),
        }
    }
}
