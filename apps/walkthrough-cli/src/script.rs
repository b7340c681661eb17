use std::path::Path;

use anyhow::{Context, bail};
use glam::{Vec2, Vec3};
use serde::Deserialize;
use walkthrough_input::{Binding, InputEvent, Key, KeyBindings};
use walkthrough_kernel::{Session, WalkEvent};
use walkthrough_rooms::load_document;

fn default_frames() -> u32 {
    1
}

fn default_dt() -> f32 {
    1.0 / 60.0
}

/// One scripted stretch of input held for a number of frames.
#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    #[serde(default = "default_frames")]
    pub frames: u32,
    #[serde(default = "default_dt")]
    pub dt: f32,
    /// Controls held for the whole step; anything not listed is released.
    #[serde(default)]
    pub hold: Vec<Binding>,
    /// Pointer delta applied before every frame of the step.
    #[serde(default)]
    pub look: Option<Vec2>,
    /// Press the activate key once at the start of the step.
    #[serde(default)]
    pub activate: bool,
    /// Place the camera here before the step runs.
    #[serde(default)]
    pub teleport: Option<Vec3>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    pub steps: Vec<Step>,
}

/// What one step ended with.
#[derive(Debug, Clone)]
pub struct StepSummary {
    pub position: Vec3,
    pub speed: f32,
    pub room: String,
    pub events: Vec<WalkEvent>,
}

impl Script {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        load_document(path).with_context(|| format!("reading script {}", path.display()))
    }

    /// Drive `session` through every step with the pointer captured.
    pub fn run(&self, session: &mut Session) -> anyhow::Result<Vec<StepSummary>> {
        let bindings = session.config().input.clone();
        session.handle(InputEvent::PointerLock(true));

        let mut held: Vec<Binding> = Vec::new();
        let mut summaries = Vec::with_capacity(self.steps.len());
        for (index, step) in self.steps.iter().enumerate() {
            let _span = tracing::debug_span!("step", index).entered();
            if step.hold.contains(&Binding::Activate) {
                bail!("step {index}: use `activate: true` instead of holding activate");
            }

            if let Some(target) = step.teleport {
                session.teleport(target);
            }
            for &binding in held.iter().filter(|b| !step.hold.contains(b)) {
                session.handle(InputEvent::KeyUp(key_for(&bindings, binding)?));
            }
            for &binding in step.hold.iter().filter(|b| !held.contains(b)) {
                session.handle(InputEvent::KeyDown(key_for(&bindings, binding)?));
            }
            held.clone_from(&step.hold);

            if step.activate {
                let key = key_for(&bindings, Binding::Activate)?;
                session.handle(InputEvent::KeyDown(key));
                session.handle(InputEvent::KeyUp(key));
            }

            for _ in 0..step.frames {
                if let Some(look) = step.look {
                    session.handle(InputEvent::PointerMotion {
                        dx: look.x,
                        dy: look.y,
                    });
                }
                session.tick(step.dt);
            }

            summaries.push(StepSummary {
                position: session.camera().position,
                speed: session.camera().speed(),
                room: session.current_room().to_string(),
                events: session.drain_events(),
            });
        }
        Ok(summaries)
    }
}

fn key_for(bindings: &KeyBindings, binding: Binding) -> anyhow::Result<Key> {
    match bindings.keys(binding).first() {
        Some(&key) => Ok(key),
        None => bail!("no key bound to {binding:?}"),
    }
}
