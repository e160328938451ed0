use std::error::Error;

use clap::Parser;
use glam::Vec3A;
use log::{error, info, warn};

mod cli;
mod logger;

use bulbtrace::app::{FrameLoop, Headless, Motion, Present};
use bulbtrace::camera::Camera;
use bulbtrace::config::RenderConfig;
use bulbtrace::error::PresentError;
use bulbtrace::field::{DistanceField, Orientation, Shape};
use bulbtrace::interval::Interval;
use bulbtrace::mandelbulb::Mandelbulb;
use bulbtrace::output::{save_image, TevPresenter, ToneMap};
use bulbtrace::plot::{draw_axes, plot_function, Polynomial};
use bulbtrace::rounded_box::RoundedBox;
use bulbtrace::sink::{Color, HdrImage};
use bulbtrace::sphere::Sphere;
use cli::{Args, Mode, SceneKind};
use logger::init_logger;

/// Build the shape selected on the command line.
fn create_shape(args: &Args) -> Shape {
    match args.scene {
        SceneKind::Mandelbulb => Mandelbulb::new(args.power).into(),
        SceneKind::RoundedBox => RoundedBox::default().into(),
        SceneKind::Sphere => Sphere::new(Vec3A::ZERO, 1.0).into(),
    }
}

/// TEV address requested on the command line, if any.
fn tev_address(args: &Args) -> Option<&str> {
    if args.tev || args.tev_address.is_some() {
        Some(args.tev_address.as_deref().unwrap_or("localhost"))
    } else {
        None
    }
}

fn main() {
    let args = Args::parse();

    init_logger(args.debug_level.clone().into());

    // Log application startup with version information
    info!("bulbtrace - Git Version {} ({})", env!("GIT_HASH"), env!("GIT_DATE"));

    if let Err(e) = run(&args) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let config = match &args.config {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::default(),
    };
    let config = args.apply_overrides(config);
    config.validate()?;

    let format = args.output_format().ok_or_else(|| {
        format!(
            "unsupported output '{}': use a .ppm, .tga, .png or .exr extension or pass --format",
            args.output.display()
        )
    })?;
    let tone = ToneMap::from_config(&config);

    info!("Image resolution: {}x{}", config.width, config.height);

    let image = match args.mode {
        Mode::Render => render_still(args, &config, tone)?,
        Mode::Animate => {
            let camera = Camera::new(&config)?;
            let shape = create_shape(args);
            match tev_address(args) {
                Some(address) => {
                    let presenter = TevPresenter::connect(address, tone, config.zoom)?;
                    animate(camera, shape, args.frames, presenter)?
                }
                None => {
                    warn!("No TEV viewer requested; only the last frame will be saved");
                    animate(camera, shape, args.frames, Headless)?
                }
            }
        }
        Mode::Plot => plot(args, &config),
    };

    save_image(&image, &args.output, format, tone)?;
    Ok(())
}

/// Render one frame of the configured shape.
fn render_still(args: &Args, config: &RenderConfig, tone: ToneMap) -> Result<HdrImage, Box<dyn Error>> {
    let mut camera = Camera::new(config)?;
    camera.show_progress = true;

    let orientation = Orientation::from_yaw_pitch_roll(args.yaw, args.pitch, args.roll);
    let field = create_shape(args).oriented(orientation);
    info!("Ray casting {:?} with yaw {} pitch {} roll {}", args.scene, args.yaw, args.pitch, args.roll);
    let image = camera.render(&field);

    if let Some(address) = tev_address(args) {
        // Display is best effort; the file is still written.
        match TevPresenter::connect(address, tone, config.zoom) {
            Ok(mut presenter) => {
                if let Err(e) = presenter.present(&image) {
                    warn!("{e}");
                }
            }
            Err(e) => warn!("{e}"),
        }
    }

    Ok(image)
}

/// Run the frame loop and return the final frame.
fn animate<P: Present>(camera: Camera, shape: Shape, frames: u32, presenter: P) -> Result<HdrImage, PresentError> {
    let mut frame_loop = FrameLoop::new(camera, shape, Motion::Spin, presenter);
    frame_loop.run(frames.max(1))?;
    Ok(frame_loop.image().clone())
}

/// Plot the polynomial from the command line with its roots boxed.
fn plot(args: &Args, config: &RenderConfig) -> HdrImage {
    let mut image = HdrImage::new(config.width, config.height);
    let polynomial = Polynomial::new(args.coefficients.clone());
    let domain = Interval::new(args.domain_min, args.domain_max);

    draw_axes(&mut image, 8, 8, Color::ONE);
    let roots = plot_function(
        &mut image,
        |x| polynomial.eval(x),
        domain,
        args.method.into(),
        Color::new(1.0, 0.0, 0.0),
    );
    info!("Roots on [{}, {}]: {:?}", domain.min, domain.max, roots);

    image
}
