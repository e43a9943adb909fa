//! Loader for the scene description format.
//!
//! A scene file is a sequence of blocks in any order:
//!
//! ```text
//! # comments run to the end of the line
//! camera { translate 0 0 -5  rotate 0 1 0 0  fov 60 aspect 1 near 1 far 20 }
//! light { position 5 5 5  color 1 1 1  attenuation 0.01 }
//! superquadric "ball" {
//!     exponents 1 1
//!     material { ambient 0.2 0.2 0.2 diffuse 0.6 0.6 0.6
//!                specular 0.4 0.4 0.4 shininess 10 }
//!     scale 1 1 1
//! }
//! assembly "group" root { children "ball"  rotate 0 0 1 45  translate 1 0 0 }
//! ```
//!
//! Transformations are appended to the object in file order. Objects
//! marked `root` are traced directly, all others only through the
//! assemblies referring to them.

// std
use std::fs::File;
use std::io::Read;
use std::path::Path;
// others
use log::{debug, info};
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
// sqtrace
use crate::core::camera::{Camera, Frustum};
use crate::core::error::{Result, SqError};
use crate::core::geometry::{Point3f, Vector3f};
use crate::core::material::Material;
use crate::core::object::{Assembly, Object};
use crate::core::scene::{Scene, SceneBuilder};
use crate::core::sqtrace::{Float, Spectrum};
use crate::core::transform::Transformation;
use crate::lights::point::PointLight;
use crate::shapes::superquadric::{SolverSettings, Superquadric};

#[derive(Parser)]
#[grammar = "core/scene.pest"]
pub struct SceneParser;

/// Read and parse a scene file.
pub fn load_scene(path: &Path, solver: &SolverSettings) -> Result<Scene> {
    info!("Loading scene {:?} ...", path);
    let mut file = File::open(path)?;
    let mut input = String::new();
    file.read_to_string(&mut input)?;
    parse_scene(&input, solver)
}

/// Parse a scene description held in memory. Every superquadric gets
/// the given Newton settings.
pub fn parse_scene(input: &str, solver: &SolverSettings) -> Result<Scene> {
    let scene_pair = SceneParser::parse(Rule::scene, input)
        .map_err(|e| SqError::Syntax(Box::new(e)))?
        .next()
        .ok_or_else(|| SqError::InvalidValue("empty scene".to_string()))?;
    let mut builder = SceneBuilder::new();
    let mut n_objects: usize = 0;
    let mut n_lights: usize = 0;
    for statement in scene_pair.into_inner() {
        match statement.as_rule() {
            Rule::camera => builder.set_camera(parse_camera(statement)?),
            Rule::light => {
                builder.add_light(parse_light(statement)?);
                n_lights += 1;
            }
            Rule::superquadric => {
                parse_superquadric(statement, solver, &mut builder)?;
                n_objects += 1;
            }
            Rule::assembly => {
                parse_assembly(statement, &mut builder)?;
                n_objects += 1;
            }
            _ => {}
        }
    }
    info!("Parsed {} object(s) and {} light(s)", n_objects, n_lights);
    builder.build()
}

fn parse_number(pair: Pair<Rule>) -> Result<Float> {
    let text = pair.as_str();
    let value: Float = text
        .parse()
        .map_err(|_| SqError::InvalidValue(format!("not a number: {:?}", text)))?;
    if !value.is_finite() {
        return Err(SqError::InvalidValue(format!("not finite: {:?}", text)));
    }
    Ok(value)
}

/// Collect all numbers below *pair*, in order.
fn parse_numbers(pair: Pair<Rule>) -> Result<Vec<Float>> {
    pair.into_inner()
        .flatten()
        .filter(|p| p.as_rule() == Rule::number)
        .map(parse_number)
        .collect()
}

fn to_vector(values: &[Float]) -> Vector3f {
    Vector3f::new(values[0], values[1], values[2])
}

fn to_spectrum(values: &[Float], what: &str) -> Result<Spectrum> {
    if values.iter().any(|v| *v < 0.0) {
        return Err(SqError::InvalidValue(format!(
            "{} must not be negative: {:?}",
            what, values
        )));
    }
    Ok(Spectrum::rgb(values[0], values[1], values[2]))
}

/// `translate`, `scale` or `rotate`; `None` for any other rule.
fn parse_transformation(pair: Pair<Rule>) -> Result<Option<Transformation>> {
    let rule = pair.as_rule();
    let values = parse_numbers(pair)?;
    let t = match rule {
        Rule::translate => Transformation::translate(to_vector(&values)),
        Rule::scale => Transformation::scale(to_vector(&values))?,
        Rule::rotate => Transformation::rotate(to_vector(&values), values[3])?,
        _ => return Ok(None),
    };
    Ok(Some(t))
}

/// Object names are quoted and must not be empty.
fn parse_name(pair: Pair<Rule>) -> Result<String> {
    let text = pair.as_str();
    match pair.clone().into_inner().next() {
        Some(inner) if !inner.as_str().is_empty() => Ok(inner.as_str().to_string()),
        _ => Err(SqError::InvalidValue(format!("bad object name {}", text))),
    }
}

fn parse_camera(pair: Pair<Rule>) -> Result<Camera> {
    let mut translate = Vector3f::default();
    let mut axis = Vector3f::new(0.0, 0.0, 1.0);
    let mut angle: Float = 0.0;
    let mut frustum = Frustum::default();
    for item in pair.into_inner() {
        let rule = item.as_rule();
        let values = parse_numbers(item)?;
        match rule {
            Rule::translate => translate = to_vector(&values),
            Rule::rotate => {
                axis = to_vector(&values);
                angle = values[3];
            }
            Rule::fov => frustum.fov = values[0],
            Rule::aspect => frustum.aspect = values[0],
            Rule::near => frustum.near = values[0],
            Rule::far => frustum.far = values[0],
            _ => {}
        }
    }
    if !(frustum.fov > 0.0 && frustum.fov < 180.0) {
        return Err(SqError::InvalidValue(format!(
            "field of view {} outside (0, 180)",
            frustum.fov
        )));
    }
    if !(frustum.aspect > 0.0 && frustum.near > 0.0 && frustum.far > frustum.near) {
        return Err(SqError::InvalidValue(format!("frustum {:?}", frustum)));
    }
    Camera::new(translate, axis, angle, frustum)
}

fn parse_light(pair: Pair<Rule>) -> Result<PointLight> {
    let mut light = PointLight::new(Point3f::default(), Spectrum::new(1.0), 0.0);
    for item in pair.into_inner() {
        let rule = item.as_rule();
        let values = parse_numbers(item)?;
        match rule {
            Rule::position => light.p_light = Point3f::from(to_vector(&values)),
            Rule::color => light.color = to_spectrum(&values, "light color")?,
            Rule::attenuation => {
                if values[0] < 0.0 {
                    return Err(SqError::InvalidValue(format!(
                        "negative attenuation {}",
                        values[0]
                    )));
                }
                light.attenuation = values[0];
            }
            _ => {}
        }
    }
    Ok(light)
}

fn parse_material(pair: Pair<Rule>) -> Result<Material> {
    let mut material = Material::default();
    for item in pair.into_inner() {
        let rule = item.as_rule();
        let values = parse_numbers(item)?;
        match rule {
            Rule::ambient => material.ambient = to_spectrum(&values, "ambient")?,
            Rule::diffuse => material.diffuse = to_spectrum(&values, "diffuse")?,
            Rule::specular => material.specular = to_spectrum(&values, "specular")?,
            Rule::shininess => {
                if values[0] < 0.0 {
                    return Err(SqError::InvalidValue(format!(
                        "negative shininess {}",
                        values[0]
                    )));
                }
                material.shininess = values[0];
            }
            _ => {}
        }
    }
    Ok(material)
}

fn parse_superquadric(
    pair: Pair<Rule>,
    solver: &SolverSettings,
    builder: &mut SceneBuilder,
) -> Result<()> {
    let mut name = String::new();
    let mut is_root = false;
    let mut exponents: (Float, Float) = (1.0, 1.0);
    let mut material = Material::default();
    let mut transforms: Vec<Transformation> = Vec::new();
    for item in pair.into_inner() {
        match item.as_rule() {
            Rule::string => name = parse_name(item)?,
            Rule::root => is_root = true,
            Rule::exponents => {
                let values = parse_numbers(item)?;
                exponents = (values[0], values[1]);
            }
            Rule::material => material = parse_material(item)?,
            _ => {
                if let Some(t) = parse_transformation(item)? {
                    transforms.push(t);
                }
            }
        }
    }
    let mut superquadric = Superquadric::new(exponents.0, exponents.1)?
        .with_material(material)
        .with_solver(*solver);
    for t in transforms {
        superquadric.add_transform(t)?;
    }
    debug!(
        "superquadric {:?}: e = {}, n = {}, {} transform(s)",
        name,
        exponents.0,
        exponents.1,
        superquadric.transforms().len()
    );
    builder.add_object(&name, Object::from(superquadric), is_root)
}

fn parse_assembly(pair: Pair<Rule>, builder: &mut SceneBuilder) -> Result<()> {
    let mut name = String::new();
    let mut is_root = false;
    let mut children: Vec<String> = Vec::new();
    let mut assembly = Assembly::new();
    for item in pair.into_inner() {
        match item.as_rule() {
            Rule::string => name = parse_name(item)?,
            Rule::root => is_root = true,
            Rule::children => {
                for child in item.into_inner() {
                    children.push(parse_name(child)?);
                }
            }
            _ => {
                if let Some(t) = parse_transformation(item)? {
                    assembly.add_transform(t)?;
                }
            }
        }
    }
    debug!("assembly {:?} with children {:?}", name, children);
    builder.add_object(&name, Object::from(assembly), is_root)?;
    for child in &children {
        builder.add_child(&name, child)?;
    }
    Ok(())
}
