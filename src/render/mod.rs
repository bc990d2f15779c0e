//! Rasterizes scene snapshots with plotters and writes them out as an animated GIF or a PNG still.

pub mod camera;

use std::path::Path;

use anyhow::{Context, Result, ensure};
use indicatif::{ProgressBar, ProgressIterator, ProgressStyle};
use log::{debug, info};
use plotters::{
    coord::Shift,
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};

use crate::{
    config::RenderConfig,
    relativity::Point,
    scene::{
        ObjectState, Scene, Snapshot,
        mobject::{Anchor, Mobject, Rgb, Shape, dashes, sub_path},
    },
};
use camera::Camera;

fn color(Rgb(r, g, b): Rgb, opacity: f64) -> RGBAColor {
    RGBColor(r, g, b).mix(opacity.clamp(0.0, 1.0))
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationRenderer {
    camera: Camera,
    frame_delay_ms: u32,
    background: Rgb,
    font_family: String,
}

impl AnimationRenderer {
    pub fn new(config: &RenderConfig) -> Self {
        let [r, g, b] = config.background;
        Self {
            camera: Camera::new(config.width, config.height, config.frame_width),
            frame_delay_ms: config.frame_delay_ms(),
            background: Rgb(r, g, b),
            font_family: config.font_family.clone(),
        }
    }

    pub fn frame_count(&self, duration_sec: f64) -> u32 {
        (duration_sec / self.frame_duration()).round() as u32
    }

    /// Timeline step between frames. Follows the delay written into the GIF, which is
    /// quantized to 10 ms, so playback runs at the timeline's speed.
    fn frame_duration(&self) -> f64 {
        self.frame_delay_ms as f64 / 1000.
    }

    /// Renders the whole scene into an infinitely looping GIF.
    pub fn render_gif(&self, scene: &Scene, path: &Path) -> Result<()> {
        let frames = self.frame_count(scene.duration());
        info!(
            "rendering {frames} frames at {}x{} to {}",
            self.camera.size().0,
            self.camera.size().1,
            path.display()
        );
        let root = BitMapBackend::gif(path, self.camera.size(), self.frame_delay_ms)
            .with_context(|| format!("failed to create {}", path.display()))?
            .into_drawing_area();

        let bar = ProgressBar::new(frames as u64).with_style(ProgressStyle::with_template(
            "[{elapsed_precise}] {wide_bar:.cyan/blue} rendering frame: {human_pos}/{human_len} {percent}% ({eta})",
        )?);

        let frame_duration = self.frame_duration();
        for i in (0..frames).progress_with(bar) {
            let time = i as f64 * frame_duration;
            self.draw_frame(&root, &scene.snapshot(time))
                .with_context(|| format!("failed to draw frame {i} ({time:.2}s)"))?;
            root.present()
                .with_context(|| format!("failed to encode frame {i}"))?;
        }
        info!("animation saved to {}", path.display());
        Ok(())
    }

    /// Renders the scene as it looks at `time` seconds into a PNG.
    pub fn render_png(&self, scene: &Scene, time: f64, path: &Path) -> Result<()> {
        ensure!(
            time.is_finite(),
            "frame time must be a finite number of seconds, got {time}"
        );
        let root = BitMapBackend::new(path, self.camera.size()).into_drawing_area();
        self.draw_frame(&root, &scene.snapshot(time))?;
        root.present()
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("frame at {time:.2}s saved to {}", path.display());
        Ok(())
    }

    pub fn draw_frame<DB>(&self, area: &DrawingArea<DB, Shift>, snapshot: &Snapshot) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        area.fill(&color(self.background, 1.0))?;
        let visible = snapshot.visible();
        debug!("drawing {} objects", visible.len());
        for state in visible {
            self.draw_object(area, snapshot, state)?;
        }
        Ok(())
    }

    fn draw_object<DB>(
        &self,
        area: &DrawingArea<DB, Shift>,
        snapshot: &Snapshot,
        state: &ObjectState,
    ) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        self.draw_mobject(area, snapshot, &state.mobject, state.progress, state.opacity)
    }

    fn pixels(&self, points: &[Point]) -> Vec<(i32, i32)> {
        points.iter().map(|p| self.camera.to_pixel(*p)).collect()
    }

    fn draw_mobject<DB>(
        &self,
        area: &DrawingArea<DB, Shift>,
        snapshot: &Snapshot,
        mobject: &Mobject,
        progress: f64,
        opacity: f64,
    ) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let opacity = mobject.style.opacity * opacity;
        if opacity <= 0.0 || progress <= 0.0 {
            return Ok(());
        }
        let stroke = ShapeStyle {
            color: color(mobject.style.color, opacity),
            filled: false,
            stroke_width: self.camera.stroke(mobject.style.width),
        };

        match &mobject.shape {
            Shape::Path { points, dash } => {
                let pieces = match dash {
                    Some(dash) => dashes(points, *dash, progress),
                    None if progress >= 1.0 => vec![points.clone()],
                    None => vec![sub_path(points, 0.0, progress)],
                };
                for piece in pieces {
                    area.draw(&PathElement::new(self.pixels(&piece), stroke))?;
                }
            }
            Shape::Dot { center, radius } => {
                let fill = mobject.style.fill.unwrap_or(mobject.style.color);
                let radius = (radius * progress * self.camera.scale()).round().max(1.0) as i32;
                area.draw(&Circle::new(
                    self.camera.to_pixel(*center),
                    radius,
                    color(fill, opacity).filled(),
                ))?;
            }
            Shape::Arrow {
                start,
                end,
                tip_length,
            } => {
                let shaft = sub_path(&[*start, *end], 0.0, progress);
                if let [from, to] = shaft[..] {
                    area.draw(&PathElement::new(self.pixels(&[from, to]), stroke))?;
                    let tip = arrow_tip(from, to, tip_length * progress);
                    area.draw(&Polygon::new(self.pixels(&tip), stroke.color.filled()))?;
                }
            }
            Shape::Rect {
                center: [x, y, z],
                width,
                height,
            } => {
                let corners = [
                    [x - width / 2., y + height / 2., *z],
                    [x + width / 2., y - height / 2., *z],
                ];
                let [top_left, bottom_right] = corners.map(|p| self.camera.to_pixel(p));
                if let Some(fill) = mobject.style.fill {
                    area.draw(&Rectangle::new(
                        [top_left, bottom_right],
                        color(fill, opacity).filled(),
                    ))?;
                }
                area.draw(&Rectangle::new([top_left, bottom_right], stroke))?;
            }
            Shape::Text {
                content,
                anchor,
                size,
            } => {
                let position = snapshot.resolve_anchor(anchor);
                if !self.camera.contains(position, 1.0) {
                    return Ok(());
                }
                let text = snapshot.resolve_text(content);
                let shown = (text.chars().count() as f64 * progress).ceil() as usize;
                let text: String = text.chars().take(shown).collect();
                let horizontal = match anchor {
                    Anchor::NextTo { direction, .. } if direction[0] > 0.0 => HPos::Left,
                    Anchor::NextTo { direction, .. } if direction[0] < 0.0 => HPos::Right,
                    _ => HPos::Center,
                };
                let font_px = size * self.camera.scale();
                let style = (self.font_family.as_str(), font_px)
                    .into_font()
                    .color(&color(mobject.style.color, opacity))
                    .pos(Pos::new(horizontal, VPos::Center));
                area.draw(&Text::new(text, self.camera.to_pixel(position), style))?;
            }
            Shape::Group(children) => {
                for child in children {
                    self.draw_mobject(area, snapshot, child, progress, opacity)?;
                }
            }
        }
        Ok(())
    }
}

/// Triangle with its apex on `to`, pointing away from `from`.
fn arrow_tip(from: Point, to: Point, length: f64) -> [Point; 3] {
    let (dx, dy) = (to[0] - from[0], to[1] - from[1]);
    let norm = (dx * dx + dy * dy).sqrt();
    if norm == 0.0 || length <= 0.0 {
        return [to; 3];
    }
    let (ux, uy) = (dx / norm, dy / norm);
    let half = length / 2.;
    let base = [to[0] - ux * length, to[1] - uy * length, to[2]];
    [
        to,
        [base[0] - uy * half, base[1] + ux * half, to[2]],
        [base[0] + uy * half, base[1] - ux * half, to[2]],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        approx_eq::ApproxEq,
        scene::animation::{Animation, Play},
    };

    fn renderer(width: u32, height: u32) -> AnimationRenderer {
        AnimationRenderer::new(&RenderConfig {
            width,
            height,
            ..Default::default()
        })
    }

    #[test]
    fn frame_count() {
        // 15 fps is written as a 70 ms delay
        assert_eq!(renderer(10, 10).frame_count(7.0), 100);
        assert_eq!(renderer(10, 10).frame_count(0.5), 7);
    }

    #[test]
    fn frame_duration() {
        assert!(renderer(10, 10).frame_duration().approx_eq(0.07));
    }

    #[test]
    fn gif_playback_matches_the_timeline() {
        let (frame_width, frame_height) = RenderConfig::default().frame();
        let duration = crate::scene::ltf::construct(0.5, (frame_width, frame_height))
            .scene
            .duration();
        for fps in [10, 15, 24, 25, 30, 60] {
            let renderer = AnimationRenderer::new(&RenderConfig {
                fps,
                ..Default::default()
            });
            let delay = renderer.frame_delay_ms as f64 / 1000.;
            let playback = renderer.frame_count(duration) as f64 * delay;
            assert!(
                (playback - duration).abs() <= delay,
                "{fps} fps plays {playback}s of a {duration}s timeline"
            );
        }
    }

    #[test]
    fn still_frame_needs_a_finite_time() {
        let mut scene = Scene::new(14.0, 8.0);
        let dot = scene.add(Mobject::dot([0.0; 3]));
        scene.play(Play::new([Animation::FadeIn(dot)]));

        let path = std::env::temp_dir().join("minkowski_nan_frame.png");
        for time in [f64::NAN, f64::INFINITY] {
            let err = renderer(16, 9).render_png(&scene, time, &path).unwrap_err();
            assert!(err.to_string().contains("finite"), "{err}");
        }
        assert!(!path.exists());
    }

    #[test]
    fn arrow_tip_points_along_the_shaft() {
        let tip = arrow_tip([0.0, 0.0, 0.0], [0.0, 2.0, 0.0], 0.2);
        assert!(tip[0].approx_eq([0.0, 2.0, 0.0]));
        assert!(tip[1].approx_eq([-0.1, 1.8, 0.0]));
        assert!(tip[2].approx_eq([0.1, 1.8, 0.0]));
    }

    #[test]
    fn draws_visible_geometry_into_a_buffer() {
        let renderer = renderer(64, 36);
        let (frame_width, frame_height) = RenderConfig::default().frame();
        let mut scene = Scene::new(frame_width, frame_height);
        let line = scene.add(
            Mobject::path(vec![[-7.0, 0.0, 0.0], [7.0, 0.0, 0.0]]).with_color(Rgb::WHITE),
        );
        scene.play(Play::new([Animation::Create(line)]));

        let (w, h) = renderer.camera.size();
        let mut before = vec![0u8; (w * h * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut before, (w, h)).into_drawing_area();
            renderer.draw_frame(&root, &scene.snapshot(-1.0)).unwrap();
            root.present().unwrap();
        }
        assert!(before.iter().all(|&b| b == 0));

        let mut after = vec![0u8; (w * h * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut after, (w, h)).into_drawing_area();
            renderer.draw_frame(&root, &scene.snapshot(1.0)).unwrap();
            root.present().unwrap();
        }
        // the middle row of the image is lit
        let row = (h / 2) as usize * w as usize * 3;
        assert!(after[row..row + w as usize * 3].iter().any(|&b| b > 0));
    }
}
