use std::rc::Rc;
use std::sync::Arc;

use anyhow::Context;
use pixelperfect_core::{Color, CurrentTimeResolver, DataResolver, SystemClock};
use pixelperfect_platform::{AnsiSink, DisplayConfig, FrameLoop};
use pixelperfect_text::{BUILTIN_FONT, BitmapFont, FontRegistry, HAlign, VAlign};
use pixelperfect_ui::*;

mod components;
mod wall;

use components::DoorInfo;

struct Face {
    tree: LayoutTree,
    root: NodeId,
    carousel: NodeId,
    door: NodeId,
}

fn font_or_builtin(fonts: &FontRegistry, name: &str) -> anyhow::Result<Arc<BitmapFont>> {
    match fonts.get(name) {
        Ok(font) => Ok(font),
        Err(e) => {
            log::warn!("{e}; falling back to {BUILTIN_FONT}");
            Ok(fonts.get(BUILTIN_FONT)?)
        }
    }
}

fn build_face(
    config: &DisplayConfig,
    fonts: &FontRegistry,
    utc_offset_minutes: i32,
    door: Rc<dyn DataResolver<DoorInfo>>,
) -> anyhow::Result<Face> {
    let big = font_or_builtin(fonts, "7x13")?;
    let small = font_or_builtin(fonts, "5x8")?;

    let mut tree = LayoutTree::new();
    let root = tree.insert(
        ContainerNode::new(),
        LayoutStyle::new().size(config.width as f32, config.height as f32),
    )?;

    let time = tree.insert(components::time_face(big, utc_offset_minutes), LayoutStyle::new())?;
    tree.add_child(root, time)?;

    let day = tree.insert(components::day_of_week(small.clone(), utc_offset_minutes), LayoutStyle::new())?;
    let utc = tree.insert(components::labeled_time(small.clone(), "UTC", 0), LayoutStyle::new())?;
    let seconds = tree.insert(
        BarChart::new(Orientation::Horizontal, 0.0, 60.0, |ctx| Some(ctx.now.rem_euclid(60.0)))
            .scale(ColorScale::new(vec![
                (0.0, Color::from_rgb(0, 96, 255)),
                (60.0, Color::from_rgb(255, 0, 96)),
            ]))
            .border(1, Color::from_rgb(48, 48, 48)),
        LayoutStyle::new().margin(2.0),
    )?;

    let icon = match IconNode::load(config.icon_dir.join("garage.png")) {
        Ok(icon) => icon,
        Err(e) => {
            log::warn!("garage icon: {e}; using the built-in one");
            IconNode::new(components::garage_icon())
        }
    };
    let alert_bg = Color::from_rgb(0, 32, 32);
    let door_row = tree.insert(ContainerNode::new().background(alert_bg), LayoutStyle::new().row())?;
    let door_icon = tree.insert(
        icon.background(alert_bg).align(HAlign::Left, VAlign::Middle),
        LayoutStyle::new().flex_grow(0.0),
    )?;
    let door_text = tree.insert(
        TextNode::fixed(small, "GARAGE OPEN")
            .color(Color::from_rgb(255, 128, 0))
            .background(alert_bg),
        LayoutStyle::new(),
    )?;
    tree.set_children(door_row, &[door_icon, door_text])?;

    let carousel = Carousel::new()
        .time_per_slice(config.time_per_slice)
        .with_panel(ClosurePanel::new(day))
        .with_panel(ClosurePanel::new(utc))
        .with_panel(ClosurePanel::new(seconds))
        .with_panel(components::door_panel(door_row, door));
    let carousel = tree.insert(carousel, LayoutStyle::new().height(12.0).flex_grow(0.0))?;
    tree.add_child(root, carousel)?;

    Ok(Face {
        tree,
        root,
        carousel,
        door: door_row,
    })
}

fn utc_offset_from_env() -> anyhow::Result<i32> {
    match std::env::var("PIXELPERFECT_UTC_OFFSET_MINUTES") {
        Ok(v) => v
            .trim()
            .parse()
            .with_context(|| format!("PIXELPERFECT_UTC_OFFSET_MINUTES={v:?}")),
        Err(_) => Ok(0),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = DisplayConfig::from_env()?;
    if !config.emulated {
        anyhow::bail!("this build has no matrix driver; set PIXELPERFECT_EMULATED=1");
    }
    let utc_offset = utc_offset_from_env()?;

    let mut fonts = FontRegistry::with_builtin();
    if config.font_dir.is_dir() {
        let n = fonts.load_dir(&config.font_dir)?;
        log::info!("loaded {n} font(s) from {}", config.font_dir.display());
    } else {
        log::warn!("font directory {} not found", config.font_dir.display());
    }

    let time = Rc::new(CurrentTimeResolver::new(SystemClock));
    let door = Rc::new(components::simulated_door());
    let face = build_face(&config, &fonts, utc_offset, door.clone())?;
    log::debug!("face carousel {:?}, door panel {:?}", face.carousel, face.door);

    let mut frame_loop = FrameLoop::new(config, face.tree, face.root, AnsiSink::stdout(), time.clone());
    frame_loop.add_resolver(time);
    frame_loop.add_resolver(door);
    if std::env::var_os("PIXELPERFECT_INSPECT").is_some() {
        frame_loop.toggle_inspector()?;
    }
    frame_loop.run_blocking()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelperfect_core::{PixelBuffer, StaticResolver};

    fn face(door: Rc<StaticResolver<DoorInfo>>) -> Face {
        let config = DisplayConfig::default();
        build_face(&config, &FontRegistry::with_builtin(), 0, door).unwrap()
    }

    #[test]
    fn test_face_draws_with_builtin_font() {
        let mut face = face(Rc::new(StaticResolver::empty()));
        let mut frame = PixelBuffer::filled(64, 32, Color::BLACK);
        face.tree
            .draw(face.root, &mut frame, &FrameContext::new(1_700_000_001.0, 0))
            .unwrap();
        let carousel = face.tree.absolute_box(face.carousel).unwrap();
        assert_eq!((carousel.y, carousel.height), (20, 12));
        assert_eq!(face.tree.children(face.carousel).unwrap().len(), 1);
    }

    #[test]
    fn test_open_door_takes_over() {
        let door = Rc::new(StaticResolver::new(DoorInfo {
            open: true,
            since: 1_700_000_000.0,
        }));
        let mut face = face(door.clone());
        let mut frame = PixelBuffer::filled(64, 32, Color::BLACK);

        let early = FrameContext::new(1_700_000_100.0, 0);
        face.tree.draw(face.root, &mut frame, &early).unwrap();
        assert_ne!(face.tree.children(face.carousel).unwrap(), vec![face.door]);

        let late = FrameContext::new(1_700_000_400.0, 1);
        face.tree.draw(face.root, &mut frame, &late).unwrap();
        assert_eq!(face.tree.children(face.carousel).unwrap(), vec![face.door]);

        door.replace(Some(DoorInfo {
            open: false,
            since: 1_700_000_450.0,
        }));
        let closed = FrameContext::new(1_700_000_500.0, 2);
        face.tree.draw(face.root, &mut frame, &closed).unwrap();
        assert_ne!(face.tree.children(face.carousel).unwrap(), vec![face.door]);
    }
}
