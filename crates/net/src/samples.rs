//! Small reference networks, written in the same text format as input files.

use crate::builder::build_network;
use crate::network::Network;

/// Edges of the two-variable rain network.
pub const RAIN_EDGES: &str = "Rain Wet\n";

/// CPTs of the two-variable rain network.
pub const RAIN_CPTS: &str = "\
Node: Rain
Values: yes,no
CPT:
yes 0.3
no 0.7

Node: Wet
Values: yes,no
Parents: Rain
CPT:
Rain=yes yes 0.9
Rain=yes no 0.1
Rain=no yes 0.1
Rain=no no 0.9
";

/// Edges of the classic sprinkler network.
///
/// ```text
///      Cloudy
///      ↙    ↘
/// Sprinkler  Rain
///      ↘    ↙
///     WetGrass
/// ```
pub const SPRINKLER_EDGES: &str = "\
# parent child
Cloudy Sprinkler
Cloudy Rain
Sprinkler WetGrass
Rain WetGrass
";

/// CPTs of the classic sprinkler network.
pub const SPRINKLER_CPTS: &str = "\
Node: Cloudy
Values: true,false
CPT:
true 0.5
false 0.5

Node: Sprinkler
Values: true,false
Parents: Cloudy
CPT:
Cloudy=true true 0.1
Cloudy=true false 0.9
Cloudy=false true 0.5
Cloudy=false false 0.5

Node: Rain
Values: true,false
Parents: Cloudy
CPT:
Cloudy=true true 0.8
Cloudy=true false 0.2
Cloudy=false true 0.2
Cloudy=false false 0.8

Node: WetGrass
Values: true,false
Parents: Sprinkler,Rain
CPT:
Sprinkler=true Rain=true true 0.99
Sprinkler=true Rain=true false 0.01
Sprinkler=true Rain=false true 0.9
Sprinkler=true Rain=false false 0.1
Sprinkler=false Rain=true true 0.8
Sprinkler=false Rain=true false 0.2
Sprinkler=false Rain=false true 0.0
Sprinkler=false Rain=false false 1.0
";

/// Rain → Wet, with P(Rain=yes) = 0.3.
pub fn rain_network() -> Network {
    build_network(RAIN_EDGES, RAIN_CPTS).expect("rain network is well formed")
}

/// Cloudy → {Sprinkler, Rain} → WetGrass.
pub fn sprinkler_network() -> Network {
    build_network(SPRINKLER_EDGES, SPRINKLER_CPTS).expect("sprinkler network is well formed")
}
