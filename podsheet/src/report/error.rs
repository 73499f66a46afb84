use snafu::Snafu;

use crate::report::QuantityError;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display(
        "Invalid {resource} {field} on container {container_name} of pod {namespace}/{pod_name}, \
         error: {source}"
    ))]
    InvalidQuantity {
        namespace: String,
        pod_name: String,
        container_name: String,
        resource: &'static str,
        field: &'static str,
        #[snafu(source(from(QuantityError, Box::new)))]
        source: Box<QuantityError>,
    },
}
