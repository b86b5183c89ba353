//! Python bindings for rhino3dm.
//!
//! Wrapper kinds become a Python class hierarchy rooted at `CommonObject`:
//!
//! ```text
//! CommonObject
//! +-- GeometryBase
//! |   +-- Curve
//! |   |   +-- NurbsCurve, LineCurve, PolylineCurve, PolyCurve, ArcCurve
//! |   +-- Mesh, Brep, ViewportInfo, Point
//! +-- Layer
//! ```
//!
//! `CommonObject.Decode` returns an instance of the most specific class.

#![allow(non_snake_case)]

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::binding::{
    ArcCurveWrapper, CommonObject, CurveBase, GeometryBase, LineCurveWrapper, MeshWrapper,
    NurbsCurveWrapper, PointWrapper, PolylineCurveWrapper, Wrapper, WrapperKind,
};
use crate::codec::{decode_wrapper, EncodeOptions, EncodedObject};
use crate::util::{DVec3, DVec4, Error, Interval, Plane};

fn to_py_err(e: Error) -> PyErr {
    match e {
        Error::TypeMismatch { .. } | Error::ComponentNotFound(_) => {
            PyValueError::new_err(e.to_string())
        }
        _ => PyRuntimeError::new_err(e.to_string()),
    }
}

fn point3(p: DVec3) -> (f64, f64, f64) {
    (p.x, p.y, p.z)
}

/// Base of every wrapped object.
#[pyclass(subclass, name = "CommonObject")]
pub struct PyCommonObject {
    pub(crate) inner: Wrapper,
}

#[pyclass(extends = PyCommonObject, subclass, name = "GeometryBase")]
pub struct PyGeometryBase;

#[pyclass(extends = PyGeometryBase, subclass, name = "Curve")]
pub struct PyCurve;

#[pyclass(extends = PyCurve, name = "NurbsCurve")]
pub struct PyNurbsCurve;

#[pyclass(extends = PyCurve, name = "LineCurve")]
pub struct PyLineCurve;

#[pyclass(extends = PyCurve, name = "PolylineCurve")]
pub struct PyPolylineCurve;

#[pyclass(extends = PyCurve, name = "PolyCurve")]
pub struct PyPolyCurve;

#[pyclass(extends = PyCurve, name = "ArcCurve")]
pub struct PyArcCurve;

#[pyclass(extends = PyGeometryBase, name = "Mesh")]
pub struct PyMesh;

#[pyclass(extends = PyGeometryBase, name = "Brep")]
pub struct PyBrep;

#[pyclass(extends = PyGeometryBase, name = "ViewportInfo")]
pub struct PyViewportInfo;

#[pyclass(extends = PyGeometryBase, name = "Point")]
pub struct PyPoint;

#[pyclass(extends = PyCommonObject, name = "Layer")]
pub struct PyLayer;

fn geometry_init(inner: Wrapper) -> PyClassInitializer<PyGeometryBase> {
    PyClassInitializer::from(PyCommonObject { inner }).add_subclass(PyGeometryBase)
}

fn curve_init(inner: Wrapper) -> PyClassInitializer<PyCurve> {
    geometry_init(inner).add_subclass(PyCurve)
}

/// Build the Python object of the class matching the wrapper kind.
pub fn into_py_wrapper(py: Python<'_>, inner: Wrapper) -> PyResult<Py<PyAny>> {
    let obj = match inner.kind() {
        WrapperKind::Common => Bound::new(py, PyCommonObject { inner })?.into_any(),
        WrapperKind::Layer => {
            Bound::new(py, PyClassInitializer::from(PyCommonObject { inner }).add_subclass(PyLayer))?
                .into_any()
        }
        WrapperKind::Geometry => Bound::new(py, geometry_init(inner))?.into_any(),
        WrapperKind::Mesh => Bound::new(py, geometry_init(inner).add_subclass(PyMesh))?.into_any(),
        WrapperKind::Brep => Bound::new(py, geometry_init(inner).add_subclass(PyBrep))?.into_any(),
        WrapperKind::Viewport => {
            Bound::new(py, geometry_init(inner).add_subclass(PyViewportInfo))?.into_any()
        }
        WrapperKind::Point => Bound::new(py, geometry_init(inner).add_subclass(PyPoint))?.into_any(),
        WrapperKind::NurbsCurve => {
            Bound::new(py, curve_init(inner).add_subclass(PyNurbsCurve))?.into_any()
        }
        WrapperKind::LineCurve => {
            Bound::new(py, curve_init(inner).add_subclass(PyLineCurve))?.into_any()
        }
        WrapperKind::PolylineCurve => {
            Bound::new(py, curve_init(inner).add_subclass(PyPolylineCurve))?.into_any()
        }
        WrapperKind::PolyCurve => {
            Bound::new(py, curve_init(inner).add_subclass(PyPolyCurve))?.into_any()
        }
        WrapperKind::ArcCurve => {
            Bound::new(py, curve_init(inner).add_subclass(PyArcCurve))?.into_any()
        }
    };
    Ok(obj.unbind())
}

fn options_from_dict(options: Option<&Bound<'_, PyDict>>) -> PyResult<EncodeOptions> {
    let mut opts = EncodeOptions::default();
    if let Some(dict) = options {
        if let Some(v) = dict.get_item("version")? {
            opts = opts.with_archive_3dm_version(v.extract::<i32>()?);
        }
        if let Some(v) = dict.get_item("writeUserData")? {
            opts = opts.with_user_data(v.extract::<bool>()?);
        }
    }
    Ok(opts)
}

fn field<'py>(dict: &Bound<'py, PyDict>, name: &str) -> PyResult<Bound<'py, PyAny>> {
    dict.get_item(name)?
        .ok_or_else(|| PyValueError::new_err(format!("missing '{}'", name)))
}

fn envelope_from_dict(dict: &Bound<'_, PyDict>) -> PyResult<EncodedObject> {
    let data: String = field(dict, "data")?.extract()?;
    let archive3dm: i32 = field(dict, "archive3dm")?.extract()?;
    let opennurbs: u32 = field(dict, "opennurbs")?.extract()?;
    let mut encoded = EncodedObject::from_base64(archive3dm, opennurbs, &data).map_err(to_py_err)?;
    encoded.version = field(dict, "version")?.extract()?;
    Ok(encoded)
}

#[pymethods]
impl PyCommonObject {
    /// Encode to a dict `{version, archive3dm, opennurbs, data}`, or None.
    #[pyo3(signature = (options=None))]
    fn Encode<'py>(
        &mut self,
        py: Python<'py>,
        options: Option<&Bound<'py, PyDict>>,
    ) -> PyResult<Option<Bound<'py, PyDict>>> {
        let opts = options_from_dict(options)?;
        let Some(encoded) = self.inner.as_common_mut().encode_with(&opts) else {
            return Ok(None);
        };
        let dict = PyDict::new(py);
        dict.set_item("version", encoded.version)?;
        dict.set_item("archive3dm", encoded.archive3dm)?;
        dict.set_item("opennurbs", encoded.opennurbs)?;
        dict.set_item("data", encoded.data_base64())?;
        Ok(Some(dict))
    }

    /// Decode a dict produced by `Encode`. Returns None when it cannot be read.
    #[staticmethod]
    fn Decode(py: Python<'_>, jsonObject: &Bound<'_, PyDict>) -> PyResult<Option<Py<PyAny>>> {
        let encoded = envelope_from_dict(jsonObject)?;
        match decode_wrapper(&encoded) {
            Some(inner) => Ok(Some(into_py_wrapper(py, inner)?)),
            None => Ok(None),
        }
    }

    fn SetUserString(&mut self, key: &str, value: &str) -> PyResult<bool> {
        self.inner
            .as_common_mut()
            .set_user_string(key, value)
            .map_err(to_py_err)
    }

    fn GetUserString(&self, key: &str) -> PyResult<Option<String>> {
        self.inner.as_common().get_user_string(key).map_err(to_py_err)
    }

    #[getter]
    fn UserStringCount(&self) -> PyResult<usize> {
        self.inner.as_common().user_string_count().map_err(to_py_err)
    }

    fn GetUserStrings(&self) -> PyResult<Vec<(String, String)>> {
        self.inner.as_common().user_strings().map_err(to_py_err)
    }

    #[getter]
    fn ObjectType(&self) -> PyResult<&'static str> {
        self.inner
            .as_common()
            .object_type()
            .map(|t| t.name())
            .map_err(to_py_err)
    }

    fn __repr__(&self) -> String {
        format!("<rhino3dm.{}>", self.inner.type_name())
    }
}

fn geometry_of<'a>(base: &'a PyCommonObject) -> PyResult<&'a dyn GeometryBase> {
    base.inner
        .as_geometry()
        .ok_or_else(|| PyValueError::new_err("not a geometry object"))
}

fn curve_of<'a>(base: &'a PyCommonObject) -> PyResult<&'a dyn CurveBase> {
    base.inner
        .as_curve()
        .ok_or_else(|| PyValueError::new_err("not a curve"))
}

#[pymethods]
impl PyGeometryBase {
    /// `((minx, miny, minz), (maxx, maxy, maxz))`
    fn GetBoundingBox(
        slf: PyRef<'_, Self>,
    ) -> PyResult<((f64, f64, f64), (f64, f64, f64))> {
        let bbox = geometry_of(&slf.as_super())?
            .bounding_box()
            .map_err(to_py_err)?;
        Ok((point3(bbox.min), point3(bbox.max)))
    }

    #[getter]
    fn IsValid(slf: PyRef<'_, Self>) -> PyResult<bool> {
        geometry_of(&slf.as_super())?.is_valid().map_err(to_py_err)
    }
}

#[pymethods]
impl PyCurve {
    #[getter]
    fn Domain(slf: PyRef<'_, Self>) -> PyResult<(f64, f64)> {
        let domain = curve_of(&slf.as_super().as_super())?
            .domain()
            .map_err(to_py_err)?;
        Ok((domain.t0, domain.t1))
    }

    #[getter]
    fn Dimension(slf: PyRef<'_, Self>) -> PyResult<u32> {
        curve_of(&slf.as_super().as_super())?
            .dimension()
            .map_err(to_py_err)
    }
}

fn nurbs_of<'a>(base: &'a PyCommonObject) -> PyResult<&'a NurbsCurveWrapper> {
    base.inner
        .as_nurbs_curve()
        .ok_or_else(|| PyValueError::new_err("not a NurbsCurve"))
}

#[pymethods]
impl PyNurbsCurve {
    #[new]
    #[pyo3(signature = (dimension, rational, order, pointCount))]
    fn new(dimension: u32, rational: bool, order: u32, pointCount: u32) -> PyClassInitializer<Self> {
        let inner = Wrapper::NurbsCurve(NurbsCurveWrapper::new(dimension, rational, order, pointCount));
        curve_init(inner).add_subclass(PyNurbsCurve)
    }

    #[getter]
    fn Order(slf: PyRef<'_, Self>) -> PyResult<u32> {
        nurbs_of(&slf.as_super().as_super().as_super())?
            .order()
            .map_err(to_py_err)
    }

    #[getter]
    fn IsRational(slf: PyRef<'_, Self>) -> PyResult<bool> {
        nurbs_of(&slf.as_super().as_super().as_super())?
            .is_rational()
            .map_err(to_py_err)
    }

    fn Knots(slf: PyRef<'_, Self>) -> PyResult<Vec<f64>> {
        nurbs_of(&slf.as_super().as_super().as_super())?
            .knots()
            .map_err(to_py_err)
    }

    /// Control point as `(x, y, z, w)`, or None when out of range.
    fn Point(slf: PyRef<'_, Self>, index: usize) -> PyResult<Option<(f64, f64, f64, f64)>> {
        let cv = nurbs_of(&slf.as_super().as_super().as_super())?
            .cv(index)
            .map_err(to_py_err)?;
        Ok(cv.map(|p| (p.x, p.y, p.z, p.w)))
    }

    fn SetPoint(
        mut slf: PyRefMut<'_, Self>,
        index: usize,
        point: (f64, f64, f64, f64),
    ) -> PyResult<bool> {
        let base = slf.as_super().as_super().as_super();
        let curve = base
            .inner
            .as_nurbs_curve_mut()
            .ok_or_else(|| PyValueError::new_err("not a NurbsCurve"))?;
        curve
            .set_cv(index, DVec4::new(point.0, point.1, point.2, point.3))
            .map_err(to_py_err)
    }
}

#[pymethods]
impl PyLineCurve {
    #[new]
    fn new(start: (f64, f64, f64), end: (f64, f64, f64)) -> PyClassInitializer<Self> {
        let inner = Wrapper::LineCurve(LineCurveWrapper::new(start.into(), end.into()));
        curve_init(inner).add_subclass(PyLineCurve)
    }

    /// `(start, end)`
    fn Line(slf: PyRef<'_, Self>) -> PyResult<((f64, f64, f64), (f64, f64, f64))> {
        let base = slf.as_super().as_super().as_super();
        let line = base
            .inner
            .as_line_curve()
            .ok_or_else(|| PyValueError::new_err("not a LineCurve"))?
            .line()
            .map_err(to_py_err)?;
        Ok((point3(line.from), point3(line.to)))
    }
}

fn arc_of<'a>(base: &'a PyCommonObject) -> PyResult<&'a ArcCurveWrapper> {
    base.inner
        .as_arc_curve()
        .ok_or_else(|| PyValueError::new_err("not an ArcCurve"))
}

#[pymethods]
impl PyArcCurve {
    /// Arc in a plane parallel to world XY. `angle` is `(t0, t1)` in radians.
    #[new]
    fn new(center: (f64, f64, f64), radius: f64, angle: (f64, f64)) -> PyClassInitializer<Self> {
        let plane = Plane {
            origin: center.into(),
            ..Plane::WORLD_XY
        };
        let inner = Wrapper::ArcCurve(ArcCurveWrapper::new(
            plane,
            radius,
            Interval::new(angle.0, angle.1),
        ));
        curve_init(inner).add_subclass(PyArcCurve)
    }

    #[getter]
    fn Radius(slf: PyRef<'_, Self>) -> PyResult<f64> {
        arc_of(slf.as_super().as_super().as_super())?
            .radius()
            .map_err(to_py_err)
    }

    #[getter]
    fn Angle(slf: PyRef<'_, Self>) -> PyResult<(f64, f64)> {
        let angle = arc_of(slf.as_super().as_super().as_super())?
            .angle()
            .map_err(to_py_err)?;
        Ok((angle.t0, angle.t1))
    }

    #[getter]
    fn IsCircle(slf: PyRef<'_, Self>) -> PyResult<bool> {
        arc_of(slf.as_super().as_super().as_super())?
            .is_circle()
            .map_err(to_py_err)
    }
}

#[pymethods]
impl PyPolylineCurve {
    #[new]
    fn new(points: Vec<(f64, f64, f64)>) -> PyClassInitializer<Self> {
        let points = points.into_iter().map(DVec3::from).collect();
        let inner = Wrapper::PolylineCurve(PolylineCurveWrapper::new(points));
        curve_init(inner).add_subclass(PyPolylineCurve)
    }

    #[getter]
    fn PointCount(slf: PyRef<'_, Self>) -> PyResult<usize> {
        let base = slf.as_super().as_super().as_super();
        base.inner
            .as_polyline_curve()
            .ok_or_else(|| PyValueError::new_err("not a PolylineCurve"))?
            .point_count()
            .map_err(to_py_err)
    }
}

#[pymethods]
impl PyMesh {
    #[new]
    fn new() -> PyClassInitializer<Self> {
        geometry_init(Wrapper::Mesh(MeshWrapper::new())).add_subclass(PyMesh)
    }

    fn AddVertex(mut slf: PyRefMut<'_, Self>, x: f64, y: f64, z: f64) -> PyResult<usize> {
        let base = slf.as_super().as_super();
        base.inner
            .as_mesh_mut()
            .ok_or_else(|| PyValueError::new_err("not a Mesh"))?
            .add_vertex(DVec3::new(x, y, z))
            .map_err(to_py_err)
    }

    /// Add a triangle (`d` omitted) or quad. Returns the face index or -1.
    #[pyo3(signature = (a, b, c, d=None))]
    fn AddFace(
        mut slf: PyRefMut<'_, Self>,
        a: u32,
        b: u32,
        c: u32,
        d: Option<u32>,
    ) -> PyResult<i64> {
        let base = slf.as_super().as_super();
        let mesh = base
            .inner
            .as_mesh_mut()
            .ok_or_else(|| PyValueError::new_err("not a Mesh"))?;
        let face = match d {
            Some(d) => mesh.add_quad(a, b, c, d),
            None => mesh.add_triangle(a, b, c),
        }
        .map_err(to_py_err)?;
        Ok(face.map_or(-1, |i| i as i64))
    }

    #[getter]
    fn VertexCount(slf: PyRef<'_, Self>) -> PyResult<usize> {
        let base = slf.as_super().as_super();
        base.inner
            .as_mesh()
            .ok_or_else(|| PyValueError::new_err("not a Mesh"))?
            .vertex_count()
            .map_err(to_py_err)
    }

    #[getter]
    fn FaceCount(slf: PyRef<'_, Self>) -> PyResult<usize> {
        let base = slf.as_super().as_super();
        base.inner
            .as_mesh()
            .ok_or_else(|| PyValueError::new_err("not a Mesh"))?
            .face_count()
            .map_err(to_py_err)
    }
}

#[pymethods]
impl PyPoint {
    #[new]
    fn new(location: (f64, f64, f64)) -> PyClassInitializer<Self> {
        geometry_init(Wrapper::Point(PointWrapper::new(location.into()))).add_subclass(PyPoint)
    }

    #[getter]
    fn Location(slf: PyRef<'_, Self>) -> PyResult<(f64, f64, f64)> {
        let base = slf.as_super().as_super();
        let p = base
            .inner
            .as_point()
            .ok_or_else(|| PyValueError::new_err("not a Point"))?
            .location()
            .map_err(to_py_err)?;
        Ok(point3(p))
    }
}

/// rhino3dm Python module.
#[pymodule]
fn rhino3dm(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyCommonObject>()?;
    m.add_class::<PyGeometryBase>()?;
    m.add_class::<PyCurve>()?;
    m.add_class::<PyNurbsCurve>()?;
    m.add_class::<PyLineCurve>()?;
    m.add_class::<PyPolylineCurve>()?;
    m.add_class::<PyPolyCurve>()?;
    m.add_class::<PyArcCurve>()?;
    m.add_class::<PyMesh>()?;
    m.add_class::<PyBrep>()?;
    m.add_class::<PyViewportInfo>()?;
    m.add_class::<PyPoint>()?;
    m.add_class::<PyLayer>()?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
