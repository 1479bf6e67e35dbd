//! Great-circle distance used by every "near me" search.

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Spherical law of cosines. Good to well under a kilometre at city scale,
/// which is all the proximity searches need.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1 = lat1.to_radians();
    let lat2 = lat2.to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let central = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * delta_lon.cos();
    // Floating point can push the cosine a hair outside [-1, 1].
    EARTH_RADIUS_KM * central.clamp(-1.0, 1.0).acos()
}
