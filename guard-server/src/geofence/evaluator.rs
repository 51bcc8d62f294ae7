//! 地理围栏判定
//!
//! 对一个定位采样和激活区域集合计算通行裁决：
//!
//! - 按 zone 号升序遍历（先到先得，保证确定性，不按最紧贴合评分）
//! - Haversine 大圆距离，地球半径 6,371,000 m
//! - 距离 ≤ 区域自身半径即短路返回 valid
//! - 全程跟踪最小距离，无命中时报告最近区域和所需半径
//!
//! 空区域集合是注册表应当阻止的状态，这里仍然防御性处理为 invalid。

use crate::db::models::{LocationSample, Verdict, Zone};

/// Mean Earth radius in meters
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Samples with a reported accuracy above this are flagged for the approver.
/// Advisory only: an inaccurate-but-inside sample still validates.
pub const MIN_ACCURACY_METERS: f64 = 100.0;

/// Great-circle distance between two lat/lon points, in meters
pub fn haversine_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_METERS * c
}

/// Evaluate one sample against the active zones
pub fn evaluate(sample: &LocationSample, zones: &[Zone]) -> Verdict {
    let is_accurate = sample.accuracy_meters <= MIN_ACCURACY_METERS;

    // Ascending zone number; iteration order is part of the contract
    let mut ordered: Vec<&Zone> = zones.iter().filter(|z| z.active).collect();
    ordered.sort_by_key(|z| z.number().unwrap_or(i64::MAX));

    let mut nearest: Option<(i64, i64, i64)> = None; // (distance, zone number, radius)
    let mut considered: u32 = 0;

    for zone in &ordered {
        let Some(number) = zone.number() else {
            continue;
        };
        considered += 1;
        let distance = haversine_meters(
            sample.latitude,
            sample.longitude,
            zone.latitude,
            zone.longitude,
        )
        .round() as i64;

        if nearest.is_none_or(|(best, _, _)| distance < best) {
            nearest = Some((distance, number, zone.radius_meters));
        }

        // First match wins
        if distance <= zone.radius_meters {
            return Verdict {
                is_valid: true,
                distance_meters: distance,
                nearest_zone_id: Some(number),
                allowed_radius: zone.radius_meters,
                is_accurate,
                considered_zone_count: considered,
            };
        }
    }

    match nearest {
        Some((distance, number, radius)) => Verdict {
            is_valid: false,
            distance_meters: distance,
            nearest_zone_id: Some(number),
            allowed_radius: radius,
            is_accurate,
            considered_zone_count: considered,
        },
        None => Verdict {
            is_valid: false,
            distance_meters: i64::MAX,
            nearest_zone_id: None,
            allowed_radius: 0,
            is_accurate,
            considered_zone_count: 0,
        },
    }
}
