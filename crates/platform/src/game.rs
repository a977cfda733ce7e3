//! The demo itself: Init once, Update every frame.

use std::time::Instant;

use anyhow::{Context, Result};
use wgpu::SurfaceError;

use asset::{mesh::MeshData, shader};
use corelib::{
    Color, camera::Camera, filter::MinFilter, stripes::StripePattern, transform::Transform,
};
use renderer::{CardObject, GpuState, RenderTarget, render_target::RTT_SIZE};

use crate::{
    DemoConfig,
    events::{EventQueue, GameEvent, KeyAction, action_for_text},
};

/// Card spin rate when `--spin` is on, degrees per second.
pub const SPIN_DEG_PER_SEC: f32 = 15.0;

/// Scene placeholder; the demo draws only the card.
#[derive(Debug, Default)]
pub struct Scene;

pub struct Game {
    cam: Camera,
    events: EventQueue,
    // Sampled through the card's bind groups; owned here for the game's lifetime.
    #[allow(dead_code)]
    rt_color: RenderTarget,
    min_filter: MinFilter,
    card: CardObject,
    card_transform: Transform,
    spin: bool,
    last_frame: Instant,
    #[allow(dead_code)]
    scene: Scene,
}

impl Game {
    /// Camera, render target, card, event queue; then draw the stripes once.
    pub fn init(gpu: &GpuState, config: &DemoConfig) -> Result<Self> {
        let (width, height) = gpu.size();
        let cam = Camera::for_viewport(width, height);

        let rt_color = RenderTarget::new(gpu, RTT_SIZE)?;

        let card_shader = shader::load_wgsl(&config.shader_path)
            .context("Failed to load card shader")?;
        let card = pollster::block_on(CardObject::new(gpu, &MeshData::card(), &card_shader, &rt_color))?;

        let events = EventQueue::default();

        rt_color.fill_stripes(gpu, &StripePattern::default());

        Ok(Self {
            cam,
            events,
            rt_color,
            min_filter: MinFilter::default(),
            card,
            card_transform: Transform::identity(),
            spin: config.spin,
            last_frame: Instant::now(),
            scene: Scene,
        })
    }

    /// Queue the event loop pushes into.
    #[inline]
    pub fn events_mut(&mut self) -> &mut EventQueue {
        &mut self.events
    }

    /// Drain events, clear, draw the card with the render target, present.
    pub fn update(&mut self, gpu: &mut GpuState) -> Result<(), SurfaceError> {
        for ev in self.events.drain() {
            apply_event(&mut self.cam, &mut self.min_filter, &ev);
        }

        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        if self.spin {
            self.card_transform.spin_z(SPIN_DEG_PER_SEC, dt);
        }

        let mvp = self.cam.proj_view() * self.card_transform.matrix();
        self.card.set_mvp(gpu.queue(), mvp);

        let card = &self.card;
        let filter = self.min_filter;
        gpu.render(Color::WHITE, |rpass| card.draw(rpass, filter))
    }
}

/// Handle one queued event.
pub fn apply_event(cam: &mut Camera, min_filter: &mut MinFilter, ev: &GameEvent) {
    match ev {
        GameEvent::FramebufferResized { width, height } => {
            cam.update_viewport(*width, *height);
            log::info!("Framebuffer resized: {}x{}", width, height);
        }
        GameEvent::Typed(text) => {
            if let Some(KeyAction::ToggleMipmap) = action_for_text(text) {
                *min_filter = min_filter.toggled();
                log::info!("Min filter: {:?}", min_filter);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_updates_camera() {
        let mut cam = Camera::for_viewport(800, 600);
        let mut filter = MinFilter::default();
        apply_event(
            &mut cam,
            &mut filter,
            &GameEvent::FramebufferResized {
                width: 1000,
                height: 500,
            },
        );
        assert!((cam.aspect - 2.0).abs() < 1e-6);
        assert_eq!(filter, MinFilter::LinearMipmapLinear);
    }

    #[test]
    fn m_key_toggles_filter_both_cases() {
        let mut cam = Camera::for_viewport(800, 600);
        let mut filter = MinFilter::default();
        apply_event(&mut cam, &mut filter, &GameEvent::Typed("m".into()));
        assert_eq!(filter, MinFilter::Linear);
        apply_event(&mut cam, &mut filter, &GameEvent::Typed("M".into()));
        assert_eq!(filter, MinFilter::LinearMipmapLinear);
    }

    #[test]
    fn other_keys_leave_state_alone() {
        let mut cam = Camera::for_viewport(800, 600);
        let before = cam.aspect;
        let mut filter = MinFilter::default();
        for key in ["x", "q", " ", "mm"] {
            apply_event(&mut cam, &mut filter, &GameEvent::Typed(key.into()));
        }
        assert_eq!(filter, MinFilter::LinearMipmapLinear);
        assert_eq!(cam.aspect, before);
    }

    #[test]
    fn queued_events_apply_in_order() {
        let mut q = EventQueue::default();
        q.push(GameEvent::Typed("m".into()));
        q.push(GameEvent::FramebufferResized { width: 300, height: 100 });
        q.push(GameEvent::Typed("m".into()));
        q.push(GameEvent::Typed("M".into()));

        let mut cam = Camera::for_viewport(800, 600);
        let mut filter = MinFilter::default();
        for ev in q.drain() {
            apply_event(&mut cam, &mut filter, &ev);
        }
        assert_eq!(filter, MinFilter::Linear);
        assert!((cam.aspect - 3.0).abs() < 1e-6);
    }
}
