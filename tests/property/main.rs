mod lifecycle;
mod normalize;
