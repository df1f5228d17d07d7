mod api;
mod estimation;
mod metadata;
mod routing;
mod spawn;
