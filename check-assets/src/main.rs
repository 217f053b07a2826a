use lager::asset::FontStyle;
use lager::{DirArchive, HeadlessDevice, ResourceError, ResourceManager};

use clap::Parser;

use std::path::PathBuf;

#[derive(Debug, Parser)]
#[clap(author, version, about = "Load assets from a data directory and report what happened")]
struct Args {
    #[clap(parse(from_os_str), long)]
    data_dir: PathBuf,
    #[clap(long)]
    texture: Vec<String>,
    #[clap(long)]
    mesh: Vec<String>,
    #[clap(long)]
    skeleton: Vec<String>,
    #[clap(long)]
    animation: Vec<String>,
    #[clap(long)]
    sound: Vec<String>,
    #[clap(long)]
    font: Vec<String>,
    /// Load fonts highlighted
    #[clap(long)]
    highlighted: bool,
    /// Also load the default, menu, dialog and warning fonts
    #[clap(long)]
    builtin_fonts: bool,
}

fn report<T>(kind: &str, name: &str, fallback: bool, r: Result<T, ResourceError>) -> bool {
    match r {
        Ok(_) if fallback => {
            println!("[fallback] {kind} {name}");
            true
        }
        Ok(_) => {
            println!("[ok]       {kind} {name}");
            true
        }
        Err(e) => {
            println!("[error]    {kind} {name}: {e}");
            false
        }
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let archive = match DirArchive::open(&args.data_dir) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("ERROR: {e}");
            std::process::exit(1);
        }
    };
    println!(
        "Indexed {n} files in {d}",
        n = archive.len(),
        d = archive.root().display()
    );

    let manager = match ResourceManager::builder()
        .archive(archive)
        .device(HeadlessDevice::new())
        .build()
    {
        Ok(m) => m,
        Err(e) => {
            eprintln!("ERROR: {e}");
            std::process::exit(1);
        }
    };

    let style = if args.highlighted {
        FontStyle::Highlighted
    } else {
        FontStyle::Normal
    };

    let mut err_count = 0;
    let mut check = |ok: bool| {
        if !ok {
            err_count += 1;
        }
    };

    for name in &args.texture {
        let r = manager.load_texture(name);
        let fallback = matches!(r, Ok(h) if h == manager.fallback_texture());
        check(report("texture", name, fallback, r));
    }

    for name in &args.mesh {
        let r = manager.load_mesh(name);
        let fallback = matches!(&r, Ok(h) if manager.get(*h).map_or(true, |m| m.is_empty()));
        check(report("mesh", name, fallback, r));
    }

    for name in &args.skeleton {
        let h = manager.load_skeleton(name);
        let fallback = manager.get(h).map_or(true, |s| s.nodes.is_empty());
        check(report::<()>("skeleton", name, fallback, Ok(())));
    }

    for name in &args.animation {
        let h = manager.load_animation(name);
        let fallback = manager.get(h).map_or(true, |a| a.frame_count == 0);
        check(report::<()>("animation", name, fallback, Ok(())));
    }

    for name in &args.sound {
        let r = manager.load_sound(name);
        let fallback =
            matches!(&r, Ok(h) if manager.get(*h).map_or(true, |s| s.duration.is_zero()));
        check(report("sound", name, fallback, r));
    }

    let mut fonts = args.font.clone();
    if args.builtin_fonts {
        let settings = manager.settings();
        fonts.push(settings.default_font.clone());
        fonts.push(settings.menu_font.clone());
        fonts.push(settings.dialog_font.clone());
        fonts.push(settings.warning_font.clone());
    }
    for name in &fonts {
        let r = manager.font(name, style);
        let fallback = matches!(&r, Ok(h) if manager.get(*h).map_or(true, |f| f.height() == 0));
        check(report("font", name, fallback, r));
    }

    println!();
    println!(
        "{:<18}{:>8}{:>8}{:>8}{:>8}{:>10}",
        "cache", "keys", "values", "hits", "misses", "fallbacks"
    );
    for (name, s) in manager.stats().iter() {
        println!(
            "{:<18}{:>8}{:>8}{:>8}{:>8}{:>10}",
            name, s.keys, s.values, s.hits, s.misses, s.fallbacks
        );
    }

    println!("{} assets failed to load", err_count);
    if err_count > 0 {
        std::process::exit(1);
    }
}
