//! Game commands and the spoken phrases that produce them.

use std::time::Instant;

use engine_core::{ColorMode, Rgb};

use crate::engine::{FallingThingsEngine, GameMode, Tunables};
use crate::shapes::{ShapeKind, ShapeSet};

/// A change to the running game.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    SetGameMode(GameMode),
    Reset,
    SetGravity(f64),
    SetDropRate(f64),
    /// Shape radius as a fraction of scene height.
    SetSize(f64),
    SetShapes(ShapeSet),
    SetColor(ColorMode),
    Pause,
    Resume,
}

impl Command {
    /// Apply to the engine. Pause and resume belong to the loop that drives
    /// the engine and are ignored here.
    pub fn apply(&self, engine: &mut FallingThingsEngine, now: Instant) {
        match *self {
            Command::SetGameMode(mode) => engine.set_game_mode(mode, now),
            Command::Reset => engine.reset(now),
            Command::SetGravity(factor) => engine.set_gravity(factor),
            Command::SetDropRate(rate) => engine.set_drop_rate(rate),
            Command::SetSize(size) => engine.set_size(size),
            Command::SetShapes(shapes) => engine.set_shapes(shapes),
            Command::SetColor(mode) => engine.set_color_mode(mode),
            Command::Pause | Command::Resume => {}
        }
    }

    /// Only these get through while the game is paused.
    pub fn accepted_while_paused(&self) -> bool {
        matches!(self, Command::Resume | Command::Reset)
    }
}

const SPEED_STEP: f64 = 1.25;
const MAX_GRAVITY: f64 = 4.0;
const MIN_GRAVITY: f64 = 0.25;

const DROP_RATE_STEP: f64 = 1.5;
const MAX_DROP_RATE: f64 = 8.0;
const MIN_DROP_RATE: f64 = 0.5;

const SIZE_STEP: f64 = 1.25;
const MAX_SHAPE_SIZE: f64 = 0.1;
const MIN_SHAPE_SIZE: f64 = 0.012;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phrase {
    Faster,
    Slower,
    Bigger,
    Biggest,
    Smaller,
    Smallest,
    More,
    Fewer,
    Shapes(ShapeSet),
    RandomColors,
    Colorize(Rgb),
    Reset,
    Pause,
    Resume,
}

const fn kind(kind: ShapeKind) -> Phrase {
    Phrase::Shapes(ShapeSet::only(kind))
}

// Lists are searched in order and the first phrase contained in what was
// said wins, so longer phrases come before their substrings.
const GAMEPLAY_PHRASES: &[(&str, Phrase)] = &[
    ("faster", Phrase::Faster),
    ("slower", Phrase::Slower),
    ("bigger shapes", Phrase::Bigger),
    ("bigger", Phrase::Bigger),
    ("larger", Phrase::Bigger),
    ("huge", Phrase::Biggest),
    ("giant", Phrase::Biggest),
    ("biggest", Phrase::Biggest),
    ("super big", Phrase::Biggest),
    ("smaller", Phrase::Smaller),
    ("tiny", Phrase::Smallest),
    ("super small", Phrase::Smallest),
    ("smallest", Phrase::Smallest),
    ("more shapes", Phrase::More),
    ("more", Phrase::More),
    ("less", Phrase::Fewer),
    ("fewer", Phrase::Fewer),
];

const SHAPE_PHRASES: &[(&str, Phrase)] = &[
    ("7 pointed stars", kind(ShapeKind::Star7)),
    ("triangles", kind(ShapeKind::Triangle)),
    ("squares", kind(ShapeKind::Square)),
    ("boxes", kind(ShapeKind::Square)),
    ("hexagons", kind(ShapeKind::Hex)),
    ("pentagons", kind(ShapeKind::Pentagon)),
    ("stars", kind(ShapeKind::Star)),
    ("circles", kind(ShapeKind::Circle)),
    ("balls", kind(ShapeKind::Circle)),
    ("bubbles", kind(ShapeKind::Bubble)),
    ("all shapes", Phrase::Shapes(ShapeSet::ALL)),
    ("everything", Phrase::Shapes(ShapeSet::ALL)),
    ("shapes", Phrase::Shapes(ShapeSet::ALL)),
];

const COLOR_PHRASES: &[(&str, Phrase)] = &[
    ("every color", Phrase::RandomColors),
    ("all colors", Phrase::RandomColors),
    ("random colors", Phrase::RandomColors),
    ("red", Phrase::Colorize(Rgb::new(240, 60, 60))),
    ("green", Phrase::Colorize(Rgb::new(60, 240, 60))),
    ("blue", Phrase::Colorize(Rgb::new(60, 60, 240))),
    ("yellow", Phrase::Colorize(Rgb::new(240, 240, 60))),
    ("orange", Phrase::Colorize(Rgb::new(255, 110, 20))),
    ("purple", Phrase::Colorize(Rgb::new(70, 30, 255))),
    ("violet", Phrase::Colorize(Rgb::new(160, 30, 245))),
    ("pink", Phrase::Colorize(Rgb::new(255, 128, 225))),
    ("gray", Phrase::Colorize(Rgb::new(192, 192, 192))),
    ("brown", Phrase::Colorize(Rgb::new(130, 80, 50))),
    ("dark", Phrase::Colorize(Rgb::new(40, 40, 40))),
    ("black", Phrase::Colorize(Rgb::new(5, 5, 5))),
    ("bright", Phrase::Colorize(Rgb::new(240, 240, 240))),
    ("white", Phrase::Colorize(Rgb::new(255, 255, 255))),
];

const SINGLE_PHRASES: &[(&str, Phrase)] = &[
    ("speed up", Phrase::Faster),
    ("slow down", Phrase::Slower),
    ("reset", Phrase::Reset),
    ("clear", Phrase::Reset),
    ("stop", Phrase::Pause),
    ("pause game", Phrase::Pause),
    ("unfreeze", Phrase::Resume),
    ("freeze", Phrase::Pause),
    ("resume", Phrase::Resume),
    ("continue", Phrase::Resume),
    ("play", Phrase::Resume),
    ("start", Phrase::Resume),
    ("go", Phrase::Resume),
];

fn find(said: &str, phrases: &[(&str, Phrase)]) -> Option<Phrase> {
    phrases
        .iter()
        .find(|(text, _)| said.contains(*text))
        .map(|(_, phrase)| *phrase)
}

/// Turn something a player said into commands, given the current settings.
///
/// A colour and a shape in one phrase ("red stars") yield both commands.
/// Returns an empty list when nothing was recognised.
pub fn interpret(said: &str, current: &Tunables) -> Vec<Command> {
    let said = said.trim().to_lowercase();
    if said.is_empty() {
        return Vec::new();
    }

    let color = match find(&said, COLOR_PHRASES) {
        Some(Phrase::Colorize(rgb)) => Some(rgb),
        _ => None,
    };

    let phrase = [GAMEPLAY_PHRASES, SHAPE_PHRASES, COLOR_PHRASES, SINGLE_PHRASES]
        .into_iter()
        .find_map(|phrases| find(&said, phrases));
    let Some(phrase) = phrase else {
        return Vec::new();
    };

    let command = match phrase {
        Phrase::Faster => Command::SetGravity((current.gravity_factor * SPEED_STEP).min(MAX_GRAVITY)),
        Phrase::Slower => Command::SetGravity((current.gravity_factor / SPEED_STEP).max(MIN_GRAVITY)),
        Phrase::More => Command::SetDropRate((current.drop_rate * DROP_RATE_STEP).min(MAX_DROP_RATE)),
        Phrase::Fewer => Command::SetDropRate((current.drop_rate / DROP_RATE_STEP).max(MIN_DROP_RATE)),
        Phrase::Bigger => Command::SetSize((current.shape_size * SIZE_STEP).min(MAX_SHAPE_SIZE)),
        Phrase::Biggest => Command::SetSize(MAX_SHAPE_SIZE),
        Phrase::Smaller => Command::SetSize((current.shape_size / SIZE_STEP).max(MIN_SHAPE_SIZE)),
        Phrase::Smallest => Command::SetSize(MIN_SHAPE_SIZE),
        Phrase::Shapes(shapes) => {
            return match color {
                Some(rgb) => vec![
                    Command::SetShapes(shapes),
                    Command::SetColor(ColorMode::Tinted(rgb)),
                ],
                None => vec![Command::SetShapes(shapes)],
            };
        }
        Phrase::RandomColors => Command::SetColor(ColorMode::Random),
        Phrase::Colorize(rgb) => Command::SetColor(ColorMode::Tinted(rgb)),
        Phrase::Reset => Command::Reset,
        Phrase::Pause => Command::Pause,
        Phrase::Resume => Command::Resume,
    };
    vec![command]
}
