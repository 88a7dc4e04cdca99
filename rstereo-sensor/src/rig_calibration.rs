use serde::Deserialize;

/// Hand-measured placement of the two cameras relative to the robot.
///
/// Nothing in the capture path reads these values. They travel with the
/// configuration so that saved pairs can later be related to the rig they
/// were taken with.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RigCalibration {
    pub left_camera_to_robot_cm: f64,
    pub right_camera_to_robot_cm: f64,
    // distance between the two optical centres
    pub baseline_cm: f64,
}

impl Default for RigCalibration {
    fn default() -> Self {
        Self {
            left_camera_to_robot_cm: 103.0,
            right_camera_to_robot_cm: 107.0,
            baseline_cm: 18.0,
        }
    }
}
