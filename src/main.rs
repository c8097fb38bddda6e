#[cfg(not(feature = "playback"))]
fn main() {
    eprintln!(
        "The jinglebox CLI requires the \"playback\" feature. Rebuild with `--features playback` to enable audible output."
    );
}

#[cfg(feature = "playback")]
mod cli {
    use std::env;
    use std::thread;
    use std::time::Duration;

    use anyhow::Context;
    use jinglebox::{AudioEngine, DifficultyTier, EffectKind, TrackStyle};

    const EFFECT_GAP_MS: u64 = 700;
    const MUSIC_DEMO_SECS: u64 = 8;

    fn usage() {
        eprintln!(
            "Usage:\n  jinglebox [--prefs <file>] [--track <fun|adventure|chill>] [--tier <easy|medium|hard>] [effect...]\n\nWith no effect names, plays the full effect tour and then {}s of music.\nEffects: click correct wrong win lose hint lock",
            MUSIC_DEMO_SECS
        );
    }

    pub fn run() -> anyhow::Result<()> {
        println!("jinglebox - procedural game audio demo");
        println!("=======================================\n");

        let mut prefs_path = String::from("jinglebox-prefs.json");
        let mut track: Option<TrackStyle> = None;
        let mut tier = DifficultyTier::Easy;
        let mut effects: Vec<EffectKind> = Vec::new();

        let mut args = env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--prefs" => {
                    prefs_path = args.next().context("--prefs requires a file path")?;
                }
                "--track" => {
                    let value = args.next().context("--track requires a style name")?;
                    track = Some(TrackStyle::parse(&value));
                }
                "--tier" => {
                    let value = args.next().context("--tier requires a tier name")?;
                    tier = DifficultyTier::parse(&value);
                }
                "--help" | "-h" => {
                    usage();
                    return Ok(());
                }
                _ if arg.starts_with('-') => {
                    eprintln!("Unknown flag: {}", arg);
                    usage();
                    return Ok(());
                }
                name => match EffectKind::from_str(name) {
                    Some(kind) => effects.push(kind),
                    None => {
                        eprintln!("Unknown effect: {}", name);
                        usage();
                        return Ok(());
                    }
                },
            }
        }

        let mut engine = AudioEngine::new(&prefs_path);
        if let Some(style) = track {
            engine.set_music_track(style);
        }
        println!("Preferences: {:?}\n", engine.preferences());

        let tour = if effects.is_empty() {
            EffectKind::ALL.to_vec()
        } else {
            effects
        };

        for kind in &tour {
            println!("Playing effect: {}", kind);
            engine.play_effect(*kind);
            thread::sleep(Duration::from_millis(EFFECT_GAP_MS));
        }

        println!("\nStarting music ({} tier) for {}s...", tier, MUSIC_DEMO_SECS);
        engine.start_music(tier);
        thread::sleep(Duration::from_secs(MUSIC_DEMO_SECS));
        engine.stop_music();

        // let the committed lookahead and decay tails play out
        thread::sleep(Duration::from_millis(500));
        println!("Done.");
        Ok(())
    }
}

#[cfg(feature = "playback")]
fn main() -> anyhow::Result<()> {
    cli::run()
}
