//! rhino3dm CLI - Tool for inspecting and converting encoded objects.

use anyhow::{anyhow, bail, Context, Result};
use std::env;
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use rhino3dm::archive::{opennurbs_version_to_write, version_string, EngineVersion, CURRENT_ENGINE_VERSION};
use rhino3dm::codec::try_decode;
use rhino3dm::prelude::*;

fn init_logging(level: &str) {
    // RUST_LOG wins over the command line flags
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut level = "info";
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => level = "debug",
            "-vv" | "--trace" => level = "trace",
            "-q" | "--quiet" => level = "error",
            _ => filtered_args.push(arg),
        }
    }
    init_logging(level);

    if filtered_args.is_empty() {
        print_help();
        return;
    }

    let result = match filtered_args[0] {
        // Info command - show envelope and object summary
        "info" | "i" => match filtered_args.get(1) {
            Some(path) => cmd_info(path),
            None => Err(anyhow!("missing file argument\nUsage: rhino3dm-cli info <file.json>")),
        },

        // Convert command - re-encode for another dialect
        "convert" | "c" => {
            if filtered_args.len() < 3 {
                Err(anyhow!(
                    "missing arguments\nUsage: rhino3dm-cli convert <in.json> <out.json> [--archive3dm N] [--no-user-data]"
                ))
            } else {
                parse_options(&filtered_args[3..])
                    .and_then(|opts| cmd_convert(filtered_args[1], filtered_args[2], &opts))
            }
        }

        // Sample command - write a sample object
        "sample" | "s" => {
            if filtered_args.len() < 3 {
                Err(anyhow!(
                    "missing arguments\nUsage: rhino3dm-cli sample <kind> <out.json> [--archive3dm N]"
                ))
            } else {
                parse_options(&filtered_args[3..])
                    .and_then(|opts| cmd_sample(filtered_args[1], filtered_args[2], &opts))
            }
        }

        "version" | "V" => {
            cmd_version();
            Ok(())
        }

        // Help
        "help" | "h" | "-h" | "--help" => {
            print_help();
            Ok(())
        }

        // Default: if file exists, show info; otherwise error
        other => {
            if Path::new(other).exists() {
                cmd_info(other)
            } else {
                eprintln!("Unknown command: {}", other);
                eprintln!();
                print_help();
                std::process::exit(1);
            }
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn print_help() {
    println!("rhino3dm-cli - encoded object toolkit");
    println!();
    println!("USAGE:");
    println!("    rhino3dm-cli [OPTIONS] <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    i, info    <file>              Show envelope and object summary");
    println!("    c, convert <in> <out>          Re-encode an object");
    println!("    s, sample  <kind> <out>        Write a sample object");
    println!("    V, version                     Show engine version and dialect table");
    println!("    h, help                        Show this help");
    println!();
    println!("CONVERT / SAMPLE OPTIONS:");
    println!("    --archive3dm N   3dm dialect to write (1-5, 50, 60, 70, 80; default 60)");
    println!("    --no-user-data   Leave user strings out of the payload");
    println!();
    println!("SAMPLE KINDS:");
    println!("    line, polyline, nurbs, polycurve, arc, mesh, brep, viewport, point, dot, layer");
    println!();
    println!("OPTIONS:");
    println!("    -v, --verbose    Show debug output");
    println!("    -vv, --trace     Show trace output (very verbose)");
    println!("    -q, --quiet      Only show errors");
    println!();
    println!("EXAMPLES:");
    println!("    rhino3dm-cli sample mesh mesh.json");
    println!("    rhino3dm-cli convert mesh.json mesh_v5.json --archive3dm 5");
    println!("    rhino3dm-cli info mesh_v5.json");
}

fn parse_options(args: &[&str]) -> Result<EncodeOptions> {
    let mut opts = EncodeOptions::default();
    let mut iter = args.iter();
    while let Some(&arg) = iter.next() {
        match arg {
            "--archive3dm" | "-a" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--archive3dm needs a value"))?;
                let version: i32 = value
                    .parse()
                    .with_context(|| format!("invalid archive version '{}'", value))?;
                opts = opts.with_archive_3dm_version(version);
            }
            "--no-user-data" => opts = opts.with_user_data(false),
            other => bail!("unknown option '{}'", other),
        }
    }
    Ok(opts)
}

fn cmd_info(path: &str) -> Result<()> {
    info!("Reading {}", path);
    let encoded = EncodedObject::load(path).with_context(|| format!("failed to read {}", path))?;

    println!("File: {}", path);
    println!("Container version: {}", encoded.version);
    println!("3dm version: {}", encoded.archive3dm);
    match EngineVersion::unpack(encoded.opennurbs) {
        Some(engine) => println!("Engine version: {} ({})", engine, encoded.opennurbs),
        None => println!("Engine version: {}", encoded.opennurbs),
    }
    println!("Payload: {} bytes", encoded.data.len());
    println!();

    let object = try_decode(&encoded).context("payload does not decode")?;
    debug!("decoded {}", object.class_name());

    let wrapper = create_wrapper(Some(object.into()))
        .ok_or_else(|| anyhow!("object cannot be wrapped"))?;
    println!("Wrapper: {}", wrapper.type_name());
    print_object(wrapper.handle())?;

    let strings = wrapper.as_common().user_strings()?;
    if !strings.is_empty() {
        println!();
        println!("User strings ({}):", strings.len());
        for (k, v) in strings {
            println!("  {} = {}", k, v);
        }
    }
    Ok(())
}

fn print_object(handle: &ObjectHandle) -> Result<()> {
    handle.with(|obj| {
        println!("Class: {}", obj.class_name());
        println!("Type: {}", obj.object_type().name());
        match obj.data() {
            ObjectData::Geometry(g) => {
                let bbox = g.bounding_box();
                println!("Valid: {}", g.is_valid());
                if !bbox.is_empty() {
                    println!("Bounding box: {:?} .. {:?}", bbox.min, bbox.max);
                }
                print_geometry(g);
            }
            ObjectData::Layer(layer) => {
                println!("Name: {}", layer.name);
                println!("Visible: {}  Locked: {}", layer.visible, layer.locked);
            }
            ObjectData::Unknown(u) => {
                println!("Class id: {}", u.class_id);
                println!("Class data: {} bytes", u.data.len());
            }
        }
    })?;
    Ok(())
}

fn print_geometry(geometry: &Geometry) {
    match geometry {
        Geometry::Mesh(m) => println!(
            "Vertices: {}  Faces: {} ({} tris, {} quads)",
            m.vertex_count(),
            m.face_count(),
            m.triangle_count(),
            m.quad_count()
        ),
        Geometry::Brep(b) => println!(
            "Vertices: {}  Edges: {}  Faces: {}",
            b.vertices().len(),
            b.edges().len(),
            b.faces().len()
        ),
        Geometry::Curve(c) => {
            let d = c.domain();
            println!("Domain: [{}, {}]  Dimension: {}", d.t0, d.t1, c.dimension());
            match c {
                Curve::Nurbs(n) => println!(
                    "Order: {}  CVs: {}  Rational: {}",
                    n.order(),
                    n.cv_count(),
                    n.is_rational()
                ),
                Curve::Polyline(p) => println!("Points: {}", p.point_count()),
                Curve::Poly(p) => println!("Segments: {}", p.segment_count()),
                Curve::Arc(a) => println!("Radius: {}  Circle: {}", a.radius, a.is_circle()),
                Curve::Line(_) => {}
            }
        }
        Geometry::Viewport(v) => println!(
            "Projection: {}  Camera: {:?}",
            if v.is_perspective_projection() { "perspective" } else { "parallel" },
            v.camera_location()
        ),
        Geometry::Point(p) => println!("Location: {:?}", p.location),
        Geometry::TextDot(d) => println!("Text: {:?} at {:?}", d.text, d.center),
    }
}

fn cmd_convert(input: &str, output: &str, opts: &EncodeOptions) -> Result<()> {
    info!("Converting {} -> {} (3dm version {})", input, output, opts.archive_3dm_version);
    let encoded = EncodedObject::load(input).with_context(|| format!("failed to read {}", input))?;
    let mut object = try_decode(&encoded).context("payload does not decode")?;
    let converted = rhino3dm::codec::try_encode(&mut object, opts)
        .with_context(|| format!("cannot encode {} for version {}", object.class_name(), opts.archive_3dm_version))?;
    converted.save(output)?;
    println!(
        "{}: {} bytes (v{}) -> {} bytes (v{})",
        object.class_name(),
        encoded.data.len(),
        encoded.archive3dm,
        converted.data.len(),
        converted.archive3dm
    );
    Ok(())
}

fn sample_object(kind: &str) -> Result<Object> {
    let object = match kind {
        "line" => Object::new(LineCurve::new(DVec3::ZERO, DVec3::new(10.0, 0.0, 0.0))),
        "polyline" => Object::new(PolylineCurve::new(vec![
            DVec3::ZERO,
            DVec3::X,
            DVec3::new(1.0, 1.0, 0.0),
            DVec3::Y,
        ])),
        "nurbs" => {
            let points = [DVec3::ZERO, DVec3::new(1.0, 2.0, 0.0), DVec3::new(3.0, 2.0, 0.0), DVec3::new(4.0, 0.0, 0.0)];
            let curve = NurbsCurve::create_clamped_uniform(3, 4, &points)
                .ok_or_else(|| anyhow!("cannot build sample curve"))?;
            Object::new(curve)
        }
        "polycurve" => {
            let mut poly = PolyCurve::new();
            poly.append(LineCurve::new(DVec3::ZERO, DVec3::X));
            poly.append(LineCurve::new(DVec3::X, DVec3::new(1.0, 1.0, 0.0)));
            Object::new(poly)
        }
        "arc" => Object::new(ArcCurve::circle(rhino3dm::util::Plane::WORLD_XY, 5.0)),
        "mesh" => {
            let mut mesh = Mesh::new();
            for p in [DVec3::ZERO, DVec3::X, DVec3::new(1.0, 1.0, 0.0), DVec3::Y] {
                mesh.add_vertex(p);
            }
            mesh.add_quad(0, 1, 2, 3);
            Object::new(mesh)
        }
        "brep" => {
            let mut brep = Brep::new();
            brep.add_vertex(DVec3::ZERO);
            brep.add_vertex(DVec3::X);
            let curve = NurbsCurve::create_clamped_uniform(3, 2, &[DVec3::ZERO, DVec3::X])
                .ok_or_else(|| anyhow!("cannot build sample edge curve"))?;
            brep.add_curve(curve);
            brep.add_edge(0, 0, 1, 0.0);
            Object::new(brep)
        }
        "viewport" => Object::new(Viewport::new()),
        "point" => Object::new(Point::new(DVec3::new(1.0, 2.0, 3.0))),
        "dot" => Object::new(TextDot::new(DVec3::ZERO, "sample")),
        "layer" => Object::new(Layer::new("Default")),
        other => bail!("unknown sample kind '{}'", other),
    };
    Ok(object)
}

fn cmd_sample(kind: &str, output: &str, opts: &EncodeOptions) -> Result<()> {
    let mut object = sample_object(kind)?;
    object.user_strings_mut().set("sample", kind);
    let encoded = rhino3dm::codec::try_encode(&mut object, opts)?;
    encoded.save(output)?;
    info!("Wrote {} ({} bytes payload) to {}", object.class_name(), encoded.data.len(), output);
    Ok(())
}

fn cmd_version() {
    println!("{}", version_string());
    println!();
    println!("3dm version -> engine version written:");
    for v in [1, 2, 3, 4, 5, 50, 60, 70, 80] {
        match opennurbs_version_to_write(v, CURRENT_ENGINE_VERSION) {
            Some(n) => println!("  {:>2} -> {}", v, n),
            None => println!("  {:>2} -> (not writable)", v),
        }
    }
}
