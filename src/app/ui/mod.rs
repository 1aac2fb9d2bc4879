mod controls;
mod entries;
mod panels;
mod tags;
