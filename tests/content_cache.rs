use archetype_content::prelude::*;
use archetype_content::{
    BlobLoader, ContentLoaderMapStore, SpriteFontLoader, TextLoader, TextureLoader,
};
use image::{ImageFormat, Rgba, RgbaImage};
use std::cell::RefCell;
use std::io::Cursor;
use std::rc::Rc;

#[derive(Default)]
struct RecordingLogger {
    infos: RefCell<Vec<String>>,
    warnings: RefCell<Vec<String>>,
    errors: RefCell<Vec<String>>,
}

impl ContentLogger for RecordingLogger {
    fn info(&self, _category: &str, message: &str) {
        self.infos.borrow_mut().push(message.to_string());
    }

    fn warn(&self, _category: &str, message: &str) {
        self.warnings.borrow_mut().push(message.to_string());
    }

    fn error(&self, _category: &str, message: &str) {
        self.errors.borrow_mut().push(message.to_string());
    }
}

struct Fixture {
    manager: ContentManager,
    fs: Rc<MemoryFileSystem>,
    device: Rc<GraphicsDevice>,
    logger: Rc<RecordingLogger>,
}

fn png(width: u32, height: u32) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, Rgba([200, 100, 50, 255]));
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageFormat::Png).unwrap();
    bytes.into_inner()
}

fn fixture() -> Fixture {
    let fs = Rc::new(MemoryFileSystem::new());
    fs.insert("assets://textures/ui_skin.png", png(16, 8));
    fs.insert("assets://fonts/dlxfont.ttf", vec![3u8, 1, 4, 1, 5, 9, 2, 6]);
    fs.insert("assets://text/intro.txt", "Welcome");
    fs.insert("assets://data/level.bin", vec![0u8; 32]);

    let device = GraphicsDevice::headless();
    let logger = Rc::new(RecordingLogger::default());
    let config = ContentConfig::default()
        .with_default_path("Texture", "assets://textures")
        .with_default_path("SpriteFont", "assets://fonts/")
        .with_default_path("Text", "assets://text/")
        .with_default_path("Blob", "assets://data/");

    let shared_fs: Rc<dyn FileSystem> = fs.clone();
    let mut manager = ContentManager::with_config(config, logger.clone());
    manager.add_loader(TextureLoader::new(shared_fs.clone(), device.clone()));
    manager.add_loader(SpriteFontLoader::new(shared_fs.clone(), device.clone()));
    manager.add_loader(TextLoader::new(shared_fs.clone()));
    manager.add_loader(BlobLoader::new(shared_fs));

    Fixture {
        manager,
        fs,
        device,
        logger,
    }
}

#[test]
fn test_identity_of_repeated_gets() {
    let mut fx = fixture();

    let first = fx.manager.get::<TextContent>("intro.txt", None).unwrap();
    assert_eq!(first.content_state().reference_count(), 1);

    let second = fx.manager.get::<TextContent>("intro.txt", None).unwrap();
    assert!(Rc::ptr_eq(&first, &second));
    assert_eq!(second.content_state().reference_count(), 2);
    assert_eq!(first.as_str(), "Welcome");
}

#[test]
fn test_distinct_params_give_distinct_entries() {
    let mut fx = fixture();

    let small = fx
        .manager
        .get::<SpriteFont>("dlxfont.ttf", Some(&SpriteFontParam::new(8)))
        .unwrap();
    let large = fx
        .manager
        .get::<SpriteFont>("dlxfont.ttf", Some(&SpriteFontParam::new(14)))
        .unwrap();

    assert!(!Rc::ptr_eq(&small, &large));
    assert_eq!(fx.manager.get_name_of(&small), "assets://fonts/dlxfont.ttf:8");
    assert_eq!(fx.manager.get_name_of(&large), "assets://fonts/dlxfont.ttf:14");
    assert_eq!(
        fx.manager.loader::<SpriteFont>().keys(),
        vec![
            "assets://fonts/dlxfont.ttf:14".to_string(),
            "assets://fonts/dlxfont.ttf:8".to_string(),
        ]
    );
    assert_eq!(small.atlas().width(), 128);
    assert_eq!(large.atlas().width(), 224);
}

#[test]
fn test_balanced_get_free_leaves_nothing_to_leak() {
    let mut fx = fixture();

    let blob = fx.manager.get::<BlobContent>("level.bin", None).unwrap();
    fx.manager.get::<BlobContent>("level.bin", None).unwrap();
    fx.manager.get::<BlobContent>("level.bin", None).unwrap();

    fx.manager.free(&blob);
    fx.manager.free_by_name::<BlobContent>("level.bin", None);
    assert!(blob.is_referenced());
    assert_eq!(fx.manager.loader::<BlobContent>().len(), 1);

    fx.manager.free(&blob);
    assert!(!blob.is_referenced());
    assert!(fx.manager.loader::<BlobContent>().is_empty());

    let logger = fx.logger.clone();
    drop(fx);
    assert!(logger.warnings.borrow().is_empty());
}

#[test]
fn test_preload_survives_unmatched_free() {
    let mut fx = fixture();

    let intro = fx.manager.load::<TextContent>("intro.txt", None).unwrap();
    assert!(!intro.content_state().is_reference_counted());

    fx.manager.free(&intro);
    fx.manager.free_by_name::<TextContent>("intro.txt", None);
    assert!(fx
        .manager
        .loader::<TextContent>()
        .contains_key("assets://text/intro.txt"));

    fx.manager.unload_by_name::<TextContent>("intro.txt", None);
    assert!(fx.manager.loader::<TextContent>().is_empty());
}

#[test]
fn test_unload_by_handle() {
    let mut fx = fixture();

    let blob = fx.manager.load::<BlobContent>("level.bin", None).unwrap();
    let again = fx.manager.get::<BlobContent>("level.bin", None).unwrap();
    assert!(Rc::ptr_eq(&blob, &again));
    assert_eq!(blob.content_state().reference_count(), 0);

    fx.manager.unload(&blob);
    assert!(fx.manager.loader::<BlobContent>().is_empty());
    assert_eq!(fx.manager.get_name_of(&blob), "");
}

#[test]
fn test_failed_load_is_retried() {
    let mut fx = fixture();

    assert!(fx.manager.get::<TextContent>("later.txt", None).is_none());
    assert_eq!(fx.logger.errors.borrow().len(), 1);
    assert!(fx.manager.loader::<TextContent>().is_empty());

    fx.fs.insert("assets://text/later.txt", "arrived");
    let later = fx.manager.get::<TextContent>("later.txt", None).unwrap();
    assert_eq!(later.as_str(), "arrived");

    let stats = fx.manager.stats_for("Text").unwrap();
    assert_eq!(stats.misses, 2);
    assert_eq!(stats.failed_loads, 1);
}

#[test]
fn test_texture_loaded_from_default_path() {
    let mut fx = fixture();

    let skin = fx.manager.get::<Texture>("ui_skin.png", None).unwrap();
    assert_eq!(fx.manager.get_name_of(&skin), "assets://textures/ui_skin.png");
    assert_eq!((skin.width(), skin.height()), (16, 8));
    assert!(skin.is_valid());

    let again = fx.manager.get::<Texture>("ui_skin.png", None).unwrap();
    assert!(Rc::ptr_eq(&skin, &again));
    assert_eq!(fx.device.live_objects(), 1);

    fx.manager.free(&skin);
    assert_eq!(fx.manager.loader::<Texture>().len(), 1);
    fx.manager.free(&again);

    assert!(fx.manager.loader::<Texture>().is_empty());
    assert!(!skin.is_valid());
    assert_eq!(fx.device.live_objects(), 0);
}

#[test]
#[should_panic(expected = "Loader already registered for content type Texture")]
fn test_second_texture_loader_panics() {
    let mut fx = fixture();
    let fs: Rc<dyn FileSystem> = fx.fs.clone();
    fx.manager
        .add_loader(TextureLoader::new(fs, fx.device.clone()));
}

#[test]
fn test_remove_all_content_reports_one_leak() {
    let mut fx = fixture();

    fx.manager.get::<TextContent>("intro.txt", None).unwrap();
    let intro = fx.manager.get::<TextContent>("intro.txt", None).unwrap();
    assert_eq!(intro.content_state().reference_count(), 2);

    fx.manager.loader_mut::<TextContent>().remove_all_content();

    let warnings = fx.logger.warnings.borrow();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("assets://text/intro.txt"));
    assert!(warnings[0].contains("references: 2"));
    assert!(fx.manager.loader::<TextContent>().is_empty());
    assert!(!intro.is_referenced());
}

#[test]
fn test_teardown_frees_everything_once() {
    let mut fx = fixture();

    fx.manager.get::<Texture>("ui_skin.png", None).unwrap();
    fx.manager.load::<BlobContent>("level.bin", None).unwrap();
    fx.manager
        .get::<SpriteFont>("dlxfont.ttf", Some(&SpriteFontParam::new(8)))
        .unwrap();
    assert_eq!(fx.device.live_objects(), 2);

    let Fixture {
        manager,
        device,
        logger,
        ..
    } = fx;
    drop(manager);

    assert_eq!(logger.warnings.borrow().len(), 3);
    assert_eq!(device.live_objects(), 0);
}

#[test]
fn test_redundant_preload_warns_and_reuses() {
    let mut fx = fixture();

    let intro = fx.manager.get::<TextContent>("intro.txt", None).unwrap();
    let preloaded = fx.manager.load::<TextContent>("intro.txt", None).unwrap();

    assert!(Rc::ptr_eq(&intro, &preloaded));
    assert_eq!(fx.logger.warnings.borrow().len(), 1);
    assert_eq!(
        fx.manager
            .loader::<TextContent>()
            .is_preloaded("assets://text/intro.txt"),
        Some(false)
    );
}

#[test]
fn test_rooted_names_skip_default_path() {
    let mut fx = fixture();
    fx.fs.insert("/abs/notes.txt", "absolute");
    fx.fs.insert("assets://elsewhere/notes.txt", "rooted");

    let absolute = fx.manager.get::<TextContent>("/abs/notes.txt", None).unwrap();
    let rooted = fx
        .manager
        .get::<TextContent>("assets://elsewhere/notes.txt", None)
        .unwrap();

    assert_eq!(absolute.as_str(), "absolute");
    assert_eq!(rooted.as_str(), "rooted");
}

#[test]
fn test_store_default_path_wins_over_config() {
    let fs = Rc::new(MemoryFileSystem::new());
    fs.insert("custom/a.txt", "custom");
    let config = ContentConfig::default().with_default_path("Text", "assets://text/");
    let mut manager = ContentManager::with_config(config, Rc::new(TracingLogger));

    let store = ContentLoaderMapStore::new(TextLoader::new(fs), manager.logger())
        .with_default_path("custom");
    manager.register_loader(store);

    let text = manager.get::<TextContent>("a.txt", None).unwrap();
    assert_eq!(text.as_str(), "custom");
    assert_eq!(manager.loader::<TextContent>().default_path(), "custom/");
}
