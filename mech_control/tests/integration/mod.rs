mod convergence;
mod fail_closed;
mod gain_reload;
mod plant_bounds;
mod shipped_configs;
