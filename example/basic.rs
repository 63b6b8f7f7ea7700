//! Example: Basic content usage
//!
//! Loads text and a font from an in-memory file system, then walks the
//! application through a suspend/resume cycle.

use archetype_content::prelude::*;
use std::rc::Rc;

fn main() -> Result<()> {
    let _logging = init_logging(&LogConfig::default())?;

    let fs = Rc::new(MemoryFileSystem::new());
    fs.insert("assets://text/greeting.txt", "Hello from the content cache");
    fs.insert("assets://fonts/mono.ttf", vec![12u8, 200, 64, 8, 150]);

    let config = ContentConfig::default()
        .with_default_path("Text", "assets://text")
        .with_default_path("SpriteFont", "assets://fonts");
    let mut app = App::new(config, GraphicsDevice::headless(), fs, Rc::new(TracingLogger));
    app.add_plugin(DefaultContentPlugin);
    app.load_game();

    let greeting = app
        .content_mut()
        .get::<TextContent>("greeting.txt", None)
        .ok_or_else(|| ContentError::NotFound("greeting.txt".to_string()))?;
    println!("{}", greeting.as_str());

    let font = app
        .content_mut()
        .load::<SpriteFont>("mono.ttf", Some(&SpriteFontParam::new(12)))
        .ok_or_else(|| ContentError::NotFound("mono.ttf".to_string()))?;
    println!(
        "Font atlas {}x{}, 'Hello' measures {:?}",
        font.atlas().width(),
        font.atlas().height(),
        font.measure("Hello")
    );

    app.suspend();
    println!("Suspended; atlas valid: {}", font.atlas().is_valid());
    app.resume();
    println!("Resumed; atlas valid: {}", font.atlas().is_valid());

    app.content_mut().free(&greeting);
    app.content_mut().unload(&font);
    Ok(())
}
